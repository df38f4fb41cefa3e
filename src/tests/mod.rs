mod docker;

use tokio::time::Duration;

/// Poll until `condition` holds. Used for assertions against the spawned
/// environment-side cleanup task.
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 1s");
}
