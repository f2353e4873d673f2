use slablist::List;

/// A bounded FIFO (First-In-First-Out) queue
/// using a slab list as the underlying storage.
struct FifoQueue<T> {
    list: List<T>,
}

impl<T> FifoQueue<T> {
    /// Creates a new queue with the given capacity
    fn new(capacity: usize) -> Result<Self, slablist::Error> {
        Ok(Self {
            list: List::with_capacity(capacity)?,
        })
    }

    /// Adds an item to the queue
    fn enqueue(&mut self, item: T) -> Result<(), slablist::Error> {
        self.list.push_back(item)?;
        Ok(())
    }

    /// Removes and returns the oldest item from the queue
    fn dequeue(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn clear(&mut self) {
        self.list.clear();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut queue = FifoQueue::new(5).expect("Failed to create queue");

    for i in 1..=5 {
        println!("Enqueuing: {}", i);
        queue.enqueue(i).expect("Queue should have space");
    }

    // Try to enqueue when full
    if let Err(e) = queue.enqueue(6) {
        println!("As expected, can't enqueue to full queue: {}", e);
    }

    while let Some(item) = queue.dequeue() {
        println!("Dequeued: {}", item);
    }

    println!("Queue is now empty: {}", queue.is_empty());

    // Slots freed by dequeue are reused
    println!("Reusing queue...");
    for i in 10..=12 {
        println!("Enqueuing: {}", i);
        queue.enqueue(i).expect("Queue should have space");
    }

    println!("Queue length: {}", queue.len());

    queue.clear();
    println!("After clear, queue is empty: {}", queue.is_empty());
}
