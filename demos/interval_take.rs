use std::{sync::Arc, time::Duration};

use hotwire::{interval, Subscriber, TokioScheduler};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), hotwire::StreamError> {
    let scheduler = Arc::new(TokioScheduler::new());

    // Emits 0, 1, 2, ... every 100ms while subscribed.
    let ticks = interval(Duration::from_millis(100), scheduler);

    let squares = ticks
        .skip(1)
        .filter(|v| v % 2 == 1)
        .map(|v| v * v)
        .take(4)
        .debug_with(|v| println!("square: {}", v));

    let total = squares.fold(|acc, v| acc + v, 0);

    let (done_tx, done_rx) = oneshot::channel();
    let done_tx = std::sync::Mutex::new(Some(done_tx));

    let observer: Subscriber<u64> = Subscriber::new(
        |v| println!("sum of squares: {}", v),
        |e| eprintln!("error: {}", e),
        move || {
            if let Some(tx) = done_tx.lock().unwrap().take() {
                let _ = tx.send(());
            }
        },
    );

    // Subscribing starts the whole chain, down to the timer.
    total.subscribe(Arc::new(observer))?;

    let _ = done_rx.await;
    println!("Completed");
    Ok(())
}
