use crate::types::Language;

/// Everything the engine needs to know about one language. Adding a language
/// is a new table entry, not a new code path.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    pub language: Language,
    /// Name of the long-lived worker container for this language.
    pub container: &'static str,
    pub image: &'static str,
    /// CPU share granted to the container, shared by every concurrent
    /// submission for this language.
    pub cpus: &'static str,
    pub memory: &'static str,
    /// Entry file name inside the staged directory. Fixed for languages whose
    /// toolchain dictates it (Java's `Main.java`).
    pub source_file: &'static str,
    /// Compile command run inside the staged directory, if the language has a
    /// separate compile step.
    pub compile_cmd: Option<&'static str>,
    /// Run command; the runner redirects the staged input file onto stdin.
    pub run_cmd: &'static str,
}

pub const PROFILES: [LanguageProfile; 3] = [
    LanguageProfile {
        language: Language::Cpp,
        container: "cpp_worker_v1",
        image: "gcc:latest",
        cpus: "1.0",
        memory: "512m",
        source_file: "main.cpp",
        compile_cmd: Some("g++ -O2 main.cpp -o prog"),
        run_cmd: "./prog",
    },
    LanguageProfile {
        language: Language::Python,
        container: "python_worker_v1",
        image: "python:3.9-slim",
        cpus: "1.0",
        memory: "512m",
        source_file: "main.py",
        compile_cmd: None,
        run_cmd: "python3 main.py",
    },
    LanguageProfile {
        language: Language::Java,
        container: "java_worker_v1",
        image: "eclipse-temurin:17-jdk",
        cpus: "1.0",
        memory: "512m",
        source_file: "Main.java",
        compile_cmd: Some("javac Main.java"),
        run_cmd: "java -cp . Main",
    },
];

pub fn profile(language: Language) -> &'static LanguageProfile {
    &PROFILES[language.index()]
}
