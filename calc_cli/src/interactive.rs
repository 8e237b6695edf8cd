//! Line-driven interactive modes: the keypad calculator and the currency
//! converter session.

use std::io::Write;

use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use calc_core::calculator::Calculator;
use calc_core::currency::{CurrencyCode, CurrencySession, RateProvider};

use crate::output::{print_currency_state, print_notices, Output};

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

/// Read key sequences line by line; `q` quits.
pub async fn calculator(out: &Output) -> Result<()> {
    let mut calc = Calculator::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    if !out.is_json() {
        println!("Keys: 0-9 . + - * / % = | c clears | < deletes | q quits");
    }
    prompt("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "q" || line == "quit" {
            break;
        }
        match calc.press_sequence(line) {
            Ok(outcomes) => out.calculator(&calc, &outcomes)?,
            Err(e) => eprintln!("{}", e),
        }
        prompt("> ");
    }
    Ok(())
}

const SESSION_HELP: &str = "\
Commands:
  <number>          set the amount
  from <CODE>       change the source currency
  to <CODE>         change the target currency
  swap              exchange source and target
  refresh           fetch the rate now
  reset             clear amount and rate
  fav               add the current pair to favorites
  pin <FROM> <TO>   pin or unpin a favorite
  favs              list favorites
  clear-favs        remove every favorite
  show              print the current state
  help              this text
  quit";

/// Interactive converter. Pair changes fetch after the debounce window and
/// print the refreshed state when the fetch lands.
pub async fn currency<P: RateProvider + 'static>(
    session: CurrencySession<P>,
    favorites_limit: usize,
    out: &Output,
) -> Result<()> {
    let session = std::sync::Arc::new(session);
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{}", SESSION_HELP);
    print_notices(&session.drain_notices());
    print_currency_state(&session.state());
    prompt("> ");

    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        let pending = match (command, args.as_slice()) {
            ("", _) => None,
            ("quit" | "q" | "exit", _) => break,
            ("help" | "?", _) => {
                println!("{}", SESSION_HELP);
                None
            }
            ("show", _) => {
                print_currency_state(&session.state());
                None
            }
            ("from", [code]) => match CurrencyCode::parse(code) {
                Ok(code) => session.set_from(code),
                Err(e) => {
                    eprintln!("{}", e);
                    None
                }
            },
            ("to", [code]) => match CurrencyCode::parse(code) {
                Ok(code) => session.set_to(code),
                Err(e) => {
                    eprintln!("{}", e);
                    None
                }
            },
            ("swap", _) => session.swap(),
            ("refresh", _) => {
                session.refresh_now().await;
                print_notices(&session.drain_notices());
                print_currency_state(&session.state());
                None
            }
            ("reset", _) => {
                session.reset();
                print_currency_state(&session.state());
                None
            }
            ("fav", _) => {
                session.add_current_favorite();
                print_notices(&session.drain_notices());
                None
            }
            ("pin", [from, to]) => {
                match (CurrencyCode::parse(from), CurrencyCode::parse(to)) {
                    (Ok(from), Ok(to)) => session.toggle_pin(from, to),
                    (Err(e), _) | (_, Err(e)) => eprintln!("{}", e),
                }
                print_notices(&session.drain_notices());
                None
            }
            ("favs", _) => {
                out.favorites(&session.favorites(), favorites_limit)?;
                None
            }
            ("clear-favs", _) => {
                session.clear_favorites();
                print_notices(&session.drain_notices());
                None
            }
            (amount, []) if amount.parse::<f64>().is_ok() => {
                session.set_amount(amount);
                print_currency_state(&session.state());
                None
            }
            _ => {
                eprintln!("Unrecognized command, type `help`");
                None
            }
        };

        if let Some(handle) = pending {
            let scheduled = session.state();
            println!("{} > {} (updating...)", scheduled.from, scheduled.to);
            let session = std::sync::Arc::clone(&session);
            tokio::spawn(async move {
                if handle.await.is_ok() {
                    let state = session.state();
                    // Superseded fetches finish without touching the state
                    if state.is_current_pair(scheduled.from, scheduled.to) && !state.loading {
                        println!();
                        print_notices(&session.drain_notices());
                        print_currency_state(&state);
                        prompt("> ");
                    }
                }
            });
        }
        prompt("> ");
    }

    session.cancel_pending();
    Ok(())
}
