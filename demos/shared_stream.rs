use std::{fmt::Display, sync::Arc, time::Duration};

use hotwire::{interval, ManualScheduler, Observer, Subscriber};

pub fn create_subscriber<T: Display + 'static>(subscriber_id: u32) -> Arc<dyn Observer<T>> {
    Arc::new(Subscriber::new(
        move |v: T| println!("Subscriber {}: {}", subscriber_id, v),
        move |e: hotwire::SharedError| eprintln!("Error {}: {}", subscriber_id, e),
        move || println!("Completed Subscriber {}", subscriber_id),
    ))
}

fn main() {
    // A hand-cranked clock: every `tick()` fires the timer once.
    let clock = Arc::new(ManualScheduler::new());
    let numbers = interval(Duration::from_secs(1), clock.clone());

    let first = create_subscriber::<u64>(1);
    numbers.subscribe(Arc::clone(&first)).unwrap();

    clock.tick(); // Subscriber 1: 0
    clock.tick(); // Subscriber 1: 1

    // Joins the running stream; there is no replay of 0 and 1.
    let second = create_subscriber::<String>(2);
    let labelled = numbers.map(|v| format!("#{}", v));
    labelled.subscribe(Arc::clone(&second)).unwrap();

    clock.tick(); // Subscriber 1: 2, Subscriber 2: #2

    numbers.unsubscribe(&first);
    clock.tick(); // Subscriber 2: #3

    // Last subscriber leaves: the timer is canceled.
    labelled.unsubscribe(&second);
    println!("live timers: {}", clock.len());
}
