use std::thread;
use std::time::Duration;

use mureo::{ProgressBar, Spinner, Tasks};

fn main() {
    let spinner = Spinner::start("Contacting the mothership...");
    thread::sleep(Duration::from_millis(900));
    spinner.message("Negotiating a response...");
    thread::sleep(Duration::from_millis(900));
    spinner.success("Mothership contacted").unwrap();

    let bar = ProgressBar::start(40, "Downloading payload");
    for _ in 0..40 {
        thread::sleep(Duration::from_millis(40));
        bar.advance(1);
    }
    bar.success("Payload downloaded").unwrap();

    let reports = Tasks::new()
        .add("Warm up caches", || {
            thread::sleep(Duration::from_millis(600));
            Ok(())
        })
        .add("Flaky migration", || {
            thread::sleep(Duration::from_millis(600));
            Err("table already exists".to_string())
        })
        .add("Final cleanup", || {
            thread::sleep(Duration::from_millis(400));
            Ok(())
        })
        .run()
        .unwrap();

    let failed = reports.iter().filter(|r| r.failed()).count();
    println!("{} task(s) failed", failed);
}
