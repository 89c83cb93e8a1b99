use static_pool::Builder;

#[derive(Debug, Default)]
struct Example {
    a: String,
    b: i64,
    c: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let pool = Builder::new()
        .static_size(100)
        .eager()
        .build(Example::default, |item: &mut Example| {
            item.a.clear();
            item.b = 0;
            item.c = 0.0;
        });

    let mut item = pool.get();
    println!("Received {item:?} from pool");

    item.a.push_str("borrowed");
    item.b = 42;
    item.c = 1.5;
    pool.put(item);
    println!("Received {:?} from pool after put", pool.get());

    pool.reset();
    println!("Retained after reset: {}", pool.retained());
}
