use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Weak};

use tracing::debug;

use super::locator::Locator;

/// Receiving end of one registration. Dropping it unsubscribes; the notifier
/// forgets it on the next `register` or `notify`.
#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<Locator>,
    _alive: Arc<()>,
}

impl Subscription {
    pub fn try_recv(&self) -> Result<Locator, TryRecvError> {
        self.rx.try_recv()
    }

    /// Consume every pending notification, returning whether there was any.
    pub fn drain(&self) -> bool {
        self.rx.try_iter().count() > 0
    }
}

#[derive(Debug)]
struct Observer {
    locator: Locator,
    tx: Sender<Locator>,
    alive: Weak<()>,
}

impl Observer {
    fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

/// Registry of observers interested in writes. Each observer is the sending
/// half of a channel; the receiving half is handed back to whoever registered.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    observers: Vec<Observer>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `locator`. Drop the receiver to unsubscribe.
    pub fn register(&mut self, locator: Locator) -> Subscription {
        self.observers.retain(Observer::is_live);

        let (tx, rx) = mpsc::channel();
        let alive = Arc::new(());
        self.observers.push(Observer {
            locator,
            tx,
            alive: Arc::downgrade(&alive),
        });
        Subscription { rx, _alive: alive }
    }

    /// Tell observers that a write went through `written`. Filtered-list
    /// observers hear about every write since any joke may enter or leave
    /// their result; record observers only hear about their own locator.
    /// Returns the number of observers reached.
    pub fn notify(&mut self, written: Locator) -> usize {
        let mut delivered = 0;
        self.observers.retain(|observer| {
            if !observer.is_live() {
                return false;
            }
            let interested = observer.locator == written
                || matches!(observer.locator, Locator::Filter(_));
            if !interested {
                return true;
            }
            match observer.tx.send(written) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        debug!(locator = %written, delivered, "change notification sent");
        delivered
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
