/// Run a blocking task on the UI thread. The snapshots are small enough
/// that synchronous work keeps the event handlers simple; swap this shim
/// for a thread pool if register sizes ever grow.
pub fn run_blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T,
{
    f()
}
