use std::str::FromStr;

use strum::{AsRefStr, EnumString};
use tracing::{debug, trace};

use crate::ecs::{Component, DomainType, EntityId, EntityStore, StoreError};
use crate::selector::{Metric, Selector, SelectorError, nearest};

use super::{Script, ScriptContext, ScriptError, ScriptValue, bind, tokenize};

/// Game operations scripts are allowed to perform.
///
/// The interpreter resolves references and arguments; the host owns the
/// state changes and the events they raise.
pub trait ScriptHost {
    type Error: From<ScriptError> + From<StoreError> + From<SelectorError>;

    fn store(&self) -> &EntityStore;

    /// Tile entities in board order.
    fn board(&self) -> &[EntityId];

    /// Adds `amount` to a player through the debt chain.
    fn credit(&mut self, player: EntityId, amount: i64) -> Result<(), Self::Error>;

    /// Takes `amount` from a player in favour of `creditor` (`None` is the bank).
    fn debit(
        &mut self,
        player: EntityId,
        creditor: Option<EntityId>,
        amount: i64,
    ) -> Result<(), Self::Error>;

    fn move_player(
        &mut self,
        player: EntityId,
        position: usize,
        instant: bool,
    ) -> Result<(), Self::Error>;

    fn jail(&mut self, player: EntityId) -> Result<(), Self::Error>;

    fn park(&mut self, player: EntityId, turns: u32) -> Result<(), Self::Error>;

    /// Picks one candidate uniformly, `None` for an empty slice.
    fn choose(&mut self, candidates: &[EntityId]) -> Option<EntityId>;

    fn log(&mut self, message: String);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
enum Keyword {
    Balance,
    Move,
    Jail,
    Park,
    Random,
    Log,
    Transaction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
enum BalanceMode {
    Add,
    Sub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
enum MoveMode {
    To,
    Near,
    Next,
}

/// Executes a script against `ctx`, line by line.
///
/// The first failing line aborts the remaining lines.
pub fn execute<H: ScriptHost>(
    host: &mut H,
    script: &Script,
    ctx: &mut ScriptContext,
) -> Result<(), H::Error> {
    for line in script.lines() {
        execute_line(host, line, ctx)?;
    }
    Ok(())
}

/// Tokenizes and binds `text` the way script lines are, then rejoins it.
pub fn render(store: &EntityStore, text: &str, ctx: &ScriptContext) -> Result<String, ScriptError> {
    let mut tokens = tokenize(text);
    bind(&mut tokens, ctx, store)?;
    Ok(tokens.join(" "))
}

fn execute_line<H: ScriptHost>(
    host: &mut H,
    line: &str,
    ctx: &mut ScriptContext,
) -> Result<(), H::Error> {
    let mut tokens = tokenize(line);
    if tokens.is_empty() {
        return Ok(());
    }
    bind(&mut tokens, ctx, host.store())?;

    trace!(target: "core::script", line, bound = ?tokens, "executing line");

    if let Ok(keyword) = Keyword::from_str(&tokens[0]) {
        invoke(host, keyword, &tokens[1..])?;
        return Ok(());
    }

    match tokens.as_slice() {
        [name, eq, rest @ ..] if eq == "=" => {
            let value = match rest.split_first() {
                Some((head, args)) => match Keyword::from_str(head) {
                    Ok(keyword) => invoke(host, keyword, args)?,
                    Err(_) => ScriptValue::Text(rest.join(" ")),
                },
                None => ScriptValue::Text(String::new()),
            };
            debug!(target: "core::script", variable = %name, %value, "assigned");
            ctx.insert(name.clone(), value);
            Ok(())
        }
        _ => Err(ScriptError::UnknownKeyword {
            keyword: tokens[0].clone(),
        }
        .into()),
    }
}

fn invoke<H: ScriptHost>(
    host: &mut H,
    keyword: Keyword,
    args: &[String],
) -> Result<ScriptValue, H::Error> {
    match keyword {
        Keyword::Balance => balance(host, args)?,
        Keyword::Move => move_to(host, args)?,
        Keyword::Jail => {
            let player = player_ref(host.store(), arg(args, 0, "jail", "player")?)?;
            host.jail(player)?;
        }
        Keyword::Park => {
            let player = player_ref(host.store(), arg(args, 0, "park", "player")?)?;
            let turns = match args.get(1) {
                Some(turns) => turns.parse().map_err(|_| ScriptError::InvalidAmount {
                    value: turns.clone(),
                })?,
                None => 1,
            };
            host.park(player, turns)?;
        }
        Keyword::Random => {
            if args.is_empty() {
                return Err(ScriptError::MissingArgument {
                    keyword: "random",
                    argument: "selector",
                }
                .into());
            }
            let selector = Selector::parse_all(args.iter().map(String::as_str))?;
            let candidates = selector.select(host.store())?;
            return Ok(host.choose(&candidates).into());
        }
        Keyword::Log => host.log(args.join(" ")),
        Keyword::Transaction => {
            let payer = player_ref(host.store(), arg(args, 0, "transaction", "payer")?)?;
            let payee = match arg(args, 1, "transaction", "payee")? {
                "bank" => None,
                reference => Some(player_ref(host.store(), reference)?),
            };
            let amount = amount(host.store(), payer, arg(args, 2, "transaction", "amount")?)?;
            host.debit(payer, payee, amount)?;
        }
    }

    Ok(ScriptValue::None)
}

/// `balance <add|sub> <player> <amount|amount%>`
fn balance<H: ScriptHost>(host: &mut H, args: &[String]) -> Result<(), H::Error> {
    let mode = arg(args, 0, "balance", "mode")?;
    let mode = BalanceMode::from_str(mode).map_err(|_| ScriptError::UnknownMode {
        keyword: "balance",
        mode: mode.to_string(),
    })?;
    let player = player_ref(host.store(), arg(args, 1, "balance", "player")?)?;
    let amount = amount(host.store(), player, arg(args, 2, "balance", "amount")?)?;

    let delta = match mode {
        BalanceMode::Add => amount,
        BalanceMode::Sub => -amount,
    };

    if delta >= 0 {
        host.credit(player, delta)
    } else {
        host.debit(player, None, -delta)
    }
}

/// `move <player> [instant] <to <tile> | near <selector...> | next <selector...>>`
fn move_to<H: ScriptHost>(host: &mut H, args: &[String]) -> Result<(), H::Error> {
    let player = player_ref(host.store(), arg(args, 0, "move", "player")?)?;

    let mut rest = &args[1..];
    let instant = rest.first().is_some_and(|token| token == "instant");
    if instant {
        rest = &rest[1..];
    }

    let (mode, targets) = rest.split_first().ok_or(ScriptError::MissingArgument {
        keyword: "move",
        argument: "mode",
    })?;
    let mode = MoveMode::from_str(mode).map_err(|_| ScriptError::UnknownMode {
        keyword: "move",
        mode: mode.clone(),
    })?;

    if targets.is_empty() {
        return Err(ScriptError::MissingArgument {
            keyword: "move",
            argument: "target",
        }
        .into());
    }

    let board = host.board();
    let position = match mode {
        MoveMode::To => {
            let target = &targets[0];
            match EntityId::from_str(target) {
                Ok(id) => Some(board.iter().position(|tile| *tile == id).ok_or_else(|| {
                    ScriptError::InvalidReference {
                        reference: target.clone(),
                    }
                })?),
                Err(_) => {
                    let candidates = Selector::parse(target)?.select(host.store())?;
                    candidates
                        .iter()
                        .find_map(|id| board.iter().position(|tile| tile == id))
                }
            }
        }
        MoveMode::Near | MoveMode::Next => {
            let metric = match mode {
                MoveMode::Next => Metric::Forward,
                _ => Metric::Shortest,
            };
            let candidates = Selector::parse_all(targets.iter().map(String::as_str))?
                .select(host.store())?;
            let from = host
                .store()
                .get_i64(Component::Position, player)
                .unwrap_or_default()
                .max(0) as usize;
            nearest(&candidates, board, from, metric).map(|(position, _)| position)
        }
    };

    match position {
        Some(position) => host.move_player(player, position, instant),
        None => {
            debug!(target: "core::script", %player, targets = ?targets, "no tile matched, not moving");
            Ok(())
        }
    }
}

fn arg<'a>(
    args: &'a [String],
    index: usize,
    keyword: &'static str,
    argument: &'static str,
) -> Result<&'a str, ScriptError> {
    args.get(index)
        .map(String::as_str)
        .ok_or(ScriptError::MissingArgument { keyword, argument })
}

fn player_ref(store: &EntityStore, reference: &str) -> Result<EntityId, ScriptError> {
    let id = EntityId::from_str(reference).map_err(|_| ScriptError::InvalidReference {
        reference: reference.to_string(),
    })?;

    if store.type_of(id) != Some(DomainType::Player) {
        return Err(ScriptError::NotAPlayer {
            reference: reference.to_string(),
        });
    }
    Ok(id)
}

/// Parses `n` or `n%`; percentages are taken of the player's current balance.
fn amount(store: &EntityStore, player: EntityId, text: &str) -> Result<i64, ScriptError> {
    let invalid = || ScriptError::InvalidAmount {
        value: text.to_string(),
    };

    let value = match text.strip_suffix('%') {
        Some(percent) => {
            let percent: f64 = percent.parse().map_err(|_| invalid())?;
            let balance = store.get_i64(Component::Balance, player).unwrap_or_default();
            balance as f64 * percent / 100.0
        }
        None => text.parse::<f64>().map_err(|_| invalid())?,
    };

    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value.trunc() as i64)
}
