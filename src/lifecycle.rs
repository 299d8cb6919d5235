use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Host lifecycle signals a widget can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Attached,
    Detached,
    Destroyed,
}

pub trait LifecycleObserver {
    fn on_lifecycle_event(&mut self, event: LifecycleEvent);
}

/// Lifecycle notifier owned by a host screen.
///
/// Observers are held weakly: registering never extends an observer's life,
/// and the observers hold nothing of the host.
#[derive(Default)]
pub struct Lifecycle {
    observers: Vec<Weak<RefCell<dyn LifecycleObserver>>>,
    current: Option<LifecycleEvent>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Weak<RefCell<dyn LifecycleObserver>>) {
        self.observers.push(observer);
    }

    /// Registers a strongly-held observer by downgrading it.
    pub fn observe<T: LifecycleObserver + 'static>(&mut self, observer: &Rc<RefCell<T>>) {
        let observer: Rc<RefCell<dyn LifecycleObserver>> = observer.clone();
        self.add_observer(Rc::downgrade(&observer));
    }

    pub fn current(&self) -> Option<LifecycleEvent> {
        self.current
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Delivers `event` to every live observer and forgets dropped ones.
    pub fn dispatch(&mut self, event: LifecycleEvent) {
        self.current = Some(event);
        self.observers.retain(|weak| match weak.upgrade() {
            Some(observer) => {
                observer.borrow_mut().on_lifecycle_event(event);
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<LifecycleEvent>);

    impl LifecycleObserver for Recorder {
        fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
            self.0.push(event);
        }
    }

    #[test]
    fn dispatches_in_order() {
        let mut lifecycle = Lifecycle::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        lifecycle.observe(&recorder);

        lifecycle.dispatch(LifecycleEvent::Attached);
        lifecycle.dispatch(LifecycleEvent::Destroyed);

        assert_eq!(
            recorder.borrow().0,
            vec![LifecycleEvent::Attached, LifecycleEvent::Destroyed]
        );
        assert_eq!(lifecycle.current(), Some(LifecycleEvent::Destroyed));
    }

    #[test]
    fn does_not_keep_observers_alive() {
        let mut lifecycle = Lifecycle::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        lifecycle.observe(&recorder);
        assert_eq!(Rc::strong_count(&recorder), 1);

        drop(recorder);
        lifecycle.dispatch(LifecycleEvent::Detached);
        assert_eq!(lifecycle.observer_count(), 0);
    }
}
