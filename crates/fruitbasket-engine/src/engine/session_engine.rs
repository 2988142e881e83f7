use std::{
    collections::VecDeque,
    fmt,
    sync::mpsc::{self, Receiver, Sender},
};

/// A game mode driven by the [`SessionEngine`].
///
/// `apply` runs one event to completion. Events the mode raises itself (timer
/// firings) go to the back of `queue` and are applied later, like any other input.
pub trait GameMode {
    type Event: Clone + fmt::Debug;
    type State;

    /// Returns the current state, as published to subscribers.
    fn state(&self) -> &Self::State;

    /// Applies one event.
    fn apply(&mut self, event: Self::Event, queue: &mut EventQueue<Self::Event>);
}

/// FIFO of events waiting to be applied.
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Appends an event after everything already queued.
    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn pop(&mut self) -> Option<E> {
        self.events.pop_front()
    }
}

/// Handle returned by [`SessionEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The engine owning the sender's queue has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("session engine has been dropped")]
pub struct EngineClosed;

/// Cloneable handle for submitting events from other threads.
///
/// Sent events wait in the engine's inbox until the owning thread calls
/// [`SessionEngine::submit`] or [`SessionEngine::pump`]; they are then applied in the
/// order they were sent.
#[derive(Debug, Clone)]
pub struct EventSender<E> {
    tx: Sender<E>,
}

impl<E> EventSender<E> {
    pub fn send(&self, event: E) -> Result<(), EngineClosed> {
        self.tx.send(event).map_err(|_| EngineClosed)
    }
}

type Subscriber<S> = Box<dyn FnMut(&S)>;

/// Serializes every state change of a [`GameMode`].
///
/// Events are applied one at a time, strictly in arrival order, each to completion
/// before the next starts. After every applied event, each subscriber receives the new
/// state, in processing order. Subscribers only see the state through a shared
/// reference; the only way to change it is to submit another event.
///
/// # Example
///
/// ```
/// use std::{cell::Cell, rc::Rc};
///
/// use fruitbasket_engine::{
///     BasketEvent, BasketGame, BasketKind, FruitKind, SessionConfig, SessionEngine,
/// };
///
/// let game = BasketGame::new(SessionConfig::default()).unwrap();
/// let mut engine = SessionEngine::new(game);
///
/// let published = Rc::new(Cell::new(0));
/// engine.subscribe({
///     let published = Rc::clone(&published);
///     move |_state| published.set(published.get() + 1)
/// });
///
/// let first = engine.snapshot().active_fruits()[0].id;
/// engine.submit(BasketEvent::Pick(first));
/// engine.submit(BasketEvent::Drop(BasketKind::Only(FruitKind::Apple)));
///
/// assert_eq!(published.get(), 2);
/// assert!(engine.snapshot().held().is_none());
/// ```
pub struct SessionEngine<M>
where
    M: GameMode,
{
    mode: M,
    queue: EventQueue<M::Event>,
    inbox: Receiver<M::Event>,
    tx: Sender<M::Event>,
    subscribers: Vec<(SubscriptionId, Subscriber<M::State>)>,
    next_subscription: u64,
    processed: u64,
}

impl<M> fmt::Debug for SessionEngine<M>
where
    M: GameMode + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("mode", &self.mode)
            .field("queued", &self.queue.len())
            .field("subscribers", &self.subscribers.len())
            .field("processed", &self.processed)
            .finish_non_exhaustive()
    }
}

impl<M> SessionEngine<M>
where
    M: GameMode,
{
    #[must_use]
    pub fn new(mode: M) -> Self {
        let (tx, inbox) = mpsc::channel();
        Self {
            mode,
            queue: EventQueue::new(),
            inbox,
            tx,
            subscribers: Vec::new(),
            next_subscription: 0,
            processed: 0,
        }
    }

    /// Returns the state after the last processed event.
    #[must_use]
    pub fn snapshot(&self) -> &M::State {
        self.mode.state()
    }

    #[must_use]
    pub fn mode(&self) -> &M {
        &self.mode
    }

    /// Returns how many events have been applied, synthetic ones included.
    #[must_use]
    pub fn processed_events(&self) -> u64 {
        self.processed
    }

    #[must_use]
    pub fn sender(&self) -> EventSender<M::Event> {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Registers a callback receiving the state after every processed event.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&M::State) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Queues `event` behind any pending input and applies everything queued.
    ///
    /// Returns the number of events applied.
    pub fn submit(&mut self, event: M::Event) -> usize {
        self.collect_inbox();
        self.queue.push(event);
        self.drain()
    }

    /// Applies events sent through [`EventSender`]s since the last call.
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        self.collect_inbox();
        self.drain()
    }

    #[must_use]
    pub fn into_mode(self) -> M {
        self.mode
    }

    fn collect_inbox(&mut self) {
        while let Ok(event) = self.inbox.try_recv() {
            self.queue.push(event);
        }
    }

    fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.queue.pop() {
            tracing::trace!(?event, queued = self.queue.len(), "applying event");
            self.mode.apply(event, &mut self.queue);
            self.processed += 1;
            applied += 1;

            let state = self.mode.state();
            for (_, subscriber) in &mut self.subscribers {
                subscriber(state);
            }
            self.collect_inbox();
        }
        applied
    }
}
