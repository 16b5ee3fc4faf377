use std::process;
use std::thread;
use std::time::Duration;

/// Hard wall-clock budget for one fetch run, independent of the per-request
/// timeout and retry accounting.
pub const HARD_TIMEOUT: Duration = Duration::from_secs(90);

const EXIT_CODE: i32 = 124;

/// Forcibly ends the process once `budget` elapses, regardless of program
/// state. The timer thread is detached; a run that finishes sooner exits
/// normally and takes the thread with it.
pub fn arm(budget: Duration) {
    thread::spawn(move || {
        thread::sleep(budget);
        eprintln!(
            "ERROR: hard timeout reached ({}s), exiting",
            budget.as_secs()
        );
        process::exit(EXIT_CODE);
    });
}
