use std::{cell::RefCell, path::PathBuf, rc::Rc, time::Duration};

use fruitbasket_engine::{
    BasketEvent, BasketGame, BasketState, GameMode, PopupEvent, PopupGame, PopupState, SpawnSeed,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    command::{ModeArg, SessionArg},
    logging,
    record::{RecordableEvent, RecordingEngine, SessionHistory},
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) session: SessionArg,
    /// Number of player events to generate
    #[clap(long, default_value_t = 200)]
    events: usize,
    /// Output file for the JSON snapshot (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
    /// Print the snapshot after every processed event instead of only the final one
    #[clap(long)]
    trace: bool,
    /// Save the generated events as a recording
    #[clap(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = "./data/recordings/")]
    record_dir: PathBuf,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    logging::init_stderr();

    let seed = arg.session.seed();
    tracing::info!(%seed, mode = %arg.session.mode(), events = arg.events, "simulating");

    let history = match arg.session.mode() {
        ModeArg::Basket => {
            let engine = RecordingEngine::new(arg.session.basket_game(seed)?);
            let engine = simulate(engine, &mut BasketPlayer::new(seed), arg)?;
            SessionHistory::basket(seed, engine)
        }
        ModeArg::Popup => {
            let engine = RecordingEngine::new(arg.session.popup_game(seed)?);
            let engine = simulate(engine, &mut PopupPlayer::new(seed), arg)?;
            SessionHistory::popup(seed, engine)
        }
    };

    if arg.save_recording {
        let path = history.save(&arg.record_dir)?;
        eprintln!("Saved recording to {}", path.display());
    }

    Ok(())
}

fn simulate<M, P>(
    mut engine: RecordingEngine<M>,
    player: &mut P,
    arg: &SimulateArg,
) -> anyhow::Result<RecordingEngine<M>>
where
    M: GameMode,
    M::Event: RecordableEvent,
    M::State: Clone + Serialize + 'static,
    P: Player<M>,
{
    let snapshots = Rc::new(RefCell::new(vec![engine.snapshot().clone()]));
    if arg.trace {
        engine.subscribe({
            let snapshots = Rc::clone(&snapshots);
            move |state: &M::State| snapshots.borrow_mut().push(state.clone())
        });
    }

    play_out(&mut engine, player, arg.events);
    tracing::info!(
        processed = engine.processed_events(),
        recorded = engine.events().len(),
        "simulation finished"
    );

    let mut output = Output::create(arg.output.clone())?;
    if arg.trace {
        output.write_json(&*snapshots.borrow())?;
    } else {
        output.write_json(engine.snapshot())?;
    }
    Ok(engine)
}

fn play_out<M, P>(engine: &mut RecordingEngine<M>, player: &mut P, events: usize)
where
    M: GameMode,
    M::Event: RecordableEvent,
    P: Player<M>,
{
    for _ in 0..events {
        let event = player.next_event(engine.snapshot());
        tracing::debug!(?event, "player event");
        engine.submit(event);
    }
}

/// Scripted stand-in for a human player.
trait Player<M>
where
    M: GameMode,
{
    fn next_event(&mut self, state: &M::State) -> M::Event;
}

fn random_tick(rng: &mut Pcg32) -> Duration {
    Duration::from_millis(rng.random_range(16..=400))
}

/// Mostly plays correctly, with the occasional release or wrong basket.
#[derive(Debug)]
struct BasketPlayer {
    rng: Pcg32,
}

impl BasketPlayer {
    fn new(seed: SpawnSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.to_bytes()),
        }
    }
}

impl Player<BasketGame> for BasketPlayer {
    fn next_event(&mut self, state: &BasketState) -> BasketEvent {
        let roll: f64 = self.rng.random();
        let fruits = state.active_fruits();
        let baskets = state.baskets();
        match state.held() {
            None if roll < 0.9 && !fruits.is_empty() => {
                let fruit = &fruits[self.rng.random_range(0..fruits.len())];
                BasketEvent::Pick(fruit.id)
            }
            Some(fruit) if roll < 0.1 => BasketEvent::Pick(fruit.id),
            Some(fruit) if !baskets.is_empty() => {
                let accepting = baskets.iter().find(|b| b.kind().accepts(fruit.kind));
                let basket = match accepting {
                    Some(basket) if roll < 0.75 => basket,
                    _ => &baskets[self.rng.random_range(0..baskets.len())],
                };
                BasketEvent::Drop(basket.kind())
            }
            _ => BasketEvent::Tick(random_tick(&mut self.rng)),
        }
    }
}

/// Lets time pass about half the time and grabs, usually at an occupied slot.
#[derive(Debug)]
struct PopupPlayer {
    rng: Pcg32,
}

impl PopupPlayer {
    fn new(seed: SpawnSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.to_bytes()),
        }
    }
}

impl Player<PopupGame> for PopupPlayer {
    fn next_event(&mut self, state: &PopupState) -> PopupEvent {
        let roll: f64 = self.rng.random();
        if roll < 0.5 || state.slots().is_empty() {
            return PopupEvent::Tick(random_tick(&mut self.rng));
        }
        let occupied: Vec<_> = (0..state.slots().len())
            .filter(|&index| state.slots()[index].active)
            .collect();
        if roll < 0.85 && !occupied.is_empty() {
            return PopupEvent::Grab(occupied[self.rng.random_range(0..occupied.len())]);
        }
        PopupEvent::Grab(self.rng.random_range(0..state.slots().len()))
    }
}
