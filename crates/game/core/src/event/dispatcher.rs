use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::{Event, EventKind};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};

/// A registered event handler.
///
/// Reactors receive the owning context mutably so they can perform further
/// transitions, including dispatching nested events.
pub type Reactor<C, E> = Rc<dyn Fn(&mut C, &Event) -> Result<(), E>>;

/// Errors raised by the dispatcher itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Nested dispatch exceeded the configured depth.
    #[error("event chain too deep while dispatching {kind} (depth {depth})")]
    ChainTooDeep { kind: EventKind, depth: usize },
}

impl GameError for DispatchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ChainTooDeep { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ChainTooDeep { .. } => "DISPATCH_CHAIN_TOO_DEEP",
        }
    }
}

/// Maps event kinds to ordered reactor lists.
pub struct EventDispatcher<C, E> {
    reactors: HashMap<EventKind, Vec<Reactor<C, E>>>,
    depth: usize,
    max_depth: usize,
}

impl<C, E> EventDispatcher<C, E> {
    pub fn new() -> Self {
        Self::with_max_depth(GameConfig::DEFAULT_MAX_EVENT_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            reactors: HashMap::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Registers `reactor` for every kind in `kinds`.
    ///
    /// Including [`EventKind::Any`] registers the reactor for the root kind
    /// only, so it is not delivered the same event twice.
    pub fn add_handler<F>(&mut self, kinds: &[EventKind], reactor: F)
    where
        F: Fn(&mut C, &Event) -> Result<(), E> + 'static,
    {
        let reactor: Reactor<C, E> = Rc::new(reactor);

        let kinds = if kinds.contains(&EventKind::Any) {
            &[EventKind::Any][..]
        } else {
            kinds
        };

        for kind in kinds {
            self.reactors
                .entry(*kind)
                .or_default()
                .push(Rc::clone(&reactor));
        }
    }

    /// Number of reactors registered directly for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.reactors.get(&kind).map_or(0, Vec::len)
    }

    /// Current nesting of in-flight dispatches.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Reactors to run for `kind`, root reactors first. The flag is false
    /// when a concrete kind has no reactors of its own.
    fn route(&self, kind: EventKind) -> (Vec<Reactor<C, E>>, bool) {
        let mut route: Vec<Reactor<C, E>> = self
            .reactors
            .get(&EventKind::Any)
            .map(|list| list.to_vec())
            .unwrap_or_default();

        if kind == EventKind::Any {
            return (route, true);
        }

        match self.reactors.get(&kind) {
            Some(list) => {
                route.extend(list.iter().cloned());
                (route, true)
            }
            None => (route, false),
        }
    }
}

impl<C, E> Default for EventDispatcher<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for EventDispatcher<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self
            .reactors
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("reactors", &counts)
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// A context that owns an event dispatcher for itself.
pub trait Dispatch: Sized {
    type Error: From<DispatchError>;

    fn dispatcher(&mut self) -> &mut EventDispatcher<Self, Self::Error>;
}

/// Delivers `event` to its reactors, depth-first.
///
/// Root reactors run first, then reactors of the concrete kind, each in
/// registration order. The first reactor error aborts the dispatch.
pub fn dispatch<C: Dispatch>(ctx: &mut C, event: &Event) -> Result<(), C::Error> {
    let kind = event.kind();

    let dispatcher = ctx.dispatcher();
    if dispatcher.depth >= dispatcher.max_depth {
        return Err(DispatchError::ChainTooDeep {
            kind,
            depth: dispatcher.depth,
        }
        .into());
    }

    let (route, handled) = dispatcher.route(kind);
    if !handled {
        debug!(target: "core::events", %kind, %event, "event has no handlers");
    }

    dispatcher.depth += 1;
    let result = route.iter().try_for_each(|reactor| reactor(ctx, event));
    ctx.dispatcher().depth -= 1;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityId;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error(transparent)]
        Dispatch(#[from] DispatchError),
    }

    struct Recorder {
        events: EventDispatcher<Recorder, TestError>,
        seen: Vec<String>,
    }

    impl Dispatch for Recorder {
        type Error = TestError;

        fn dispatcher(&mut self) -> &mut EventDispatcher<Self, Self::Error> {
            &mut self.events
        }
    }

    fn recorder(max_depth: usize) -> Recorder {
        Recorder {
            events: EventDispatcher::with_max_depth(max_depth),
            seen: Vec::new(),
        }
    }

    fn turn_start() -> Event {
        Event::TurnStart {
            player: EntityId(0),
        }
    }

    #[test]
    fn root_reactors_run_before_concrete_ones() {
        let mut ctx = recorder(8);
        ctx.events.add_handler(&[EventKind::TurnStart], |c: &mut Recorder, _| {
            c.seen.push("concrete".into());
            Ok(())
        });
        ctx.events.add_handler(&[EventKind::Any], |c: &mut Recorder, _| {
            c.seen.push("root".into());
            Ok(())
        });

        dispatch(&mut ctx, &turn_start()).unwrap();
        assert_eq!(ctx.seen, ["root", "concrete"]);
    }

    #[test]
    fn any_collapses_co_registered_kinds() {
        let mut ctx = recorder(8);
        ctx.events.add_handler(
            &[EventKind::TurnStart, EventKind::Any, EventKind::TurnEnd],
            |c: &mut Recorder, _| {
                c.seen.push("once".into());
                Ok(())
            },
        );

        assert_eq!(ctx.events.handler_count(EventKind::TurnStart), 0);
        dispatch(&mut ctx, &turn_start()).unwrap();
        assert_eq!(ctx.seen, ["once"]);
    }

    #[test]
    fn message_reaches_only_root_reactors() {
        let mut ctx = recorder(8);
        ctx.events.add_handler(&[EventKind::TurnStart], |c: &mut Recorder, _| {
            c.seen.push("concrete".into());
            Ok(())
        });

        dispatch(&mut ctx, &Event::message("hello")).unwrap();
        dispatch(&mut ctx, &Event::TurnEnd { player: EntityId(1) }).unwrap();
        assert!(ctx.seen.is_empty());
    }

    #[test]
    fn nested_dispatch_is_depth_first() {
        let mut ctx = recorder(8);
        ctx.events.add_handler(&[EventKind::TurnStart], |c: &mut Recorder, e| {
            c.seen.push(format!("start {}", e.player().unwrap_or(EntityId(0))));
            dispatch(c, &Event::TurnEnd { player: EntityId(0) })?;
            c.seen.push("start done".into());
            Ok(())
        });
        ctx.events.add_handler(&[EventKind::TurnEnd], |c: &mut Recorder, _| {
            c.seen.push("end".into());
            Ok(())
        });

        dispatch(&mut ctx, &turn_start()).unwrap();
        assert_eq!(ctx.seen, ["start #0", "end", "start done"]);
        assert_eq!(ctx.events.depth(), 0);
    }

    #[test]
    fn runaway_chain_is_reported() {
        let mut ctx = recorder(4);
        ctx.events.add_handler(&[EventKind::TurnStart], |c: &mut Recorder, e| {
            dispatch(c, e)
        });

        let err = dispatch(&mut ctx, &turn_start()).unwrap_err();
        assert!(matches!(
            err,
            TestError::Dispatch(DispatchError::ChainTooDeep { depth: 4, .. })
        ));
        assert_eq!(ctx.events.depth(), 0);
    }
}
