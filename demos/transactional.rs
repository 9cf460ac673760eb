use std::sync::{Arc, Mutex};

use buffered_producer::{BufferedProducer, LogTransport, ProducerConfig, Route, UnitOfWorkError};
use serde::Serialize;

#[derive(Serialize)]
struct OrderPlaced {
    order_id: u32,
    total_cents: u64,
}

fn place_order(order_id: u32, total_cents: u64) -> Result<OrderPlaced, String> {
    if total_cents == 0 {
        return Err(format!("order {} has no items", order_id));
    }
    Ok(OrderPlaced {
        order_id,
        total_cents,
    })
}

fn main() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let producer = BufferedProducer::with_config(
        LogTransport::with_buffer(lines.clone()),
        ProducerConfig::new("orders-demo"),
    );
    let placed = Route::new("orders", "placed");

    let mut ctx = producer.context();
    for (order_id, total_cents) in [(1, 1250), (2, 0), (3, 990)] {
        let outcome = producer.unit_of_work(&mut ctx, |scope| {
            let event = place_order(order_id, total_cents)?;
            scope
                .send(event, placed.clone())
                .map_err(|e| e.to_string())?;
            Ok::<_, String>(order_id)
        });

        match outcome {
            Ok((id, report)) => println!("order {} committed, {} event(s) sent", id, report.events),
            Err(UnitOfWorkError::Aborted(reason)) => println!("rolled back: {}", reason),
            Err(UnitOfWorkError::Flush(err)) => println!("committed but not announced: {}", err),
        }
    }

    let lines = lines.lock().map(|l| l.clone()).unwrap_or_default();
    for line in lines {
        println!("{}", line);
    }
}
