/// The chat command surface.
///
/// `/add usd`, `/delete usd`, `/give`, `/rate eurusd 100`, plus the
/// record form `/<account> <amount-expr> [comment]` where the first
/// whitespace-separated token after the account name is the expression
/// and everything after it is the free-text comment.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    AddAccount {
        name: String,
    },
    DeleteAccount {
        name: String,
    },
    ShowBalances,
    ConvertRate {
        pair: String,
        amount: f64,
    },
    Record {
        account: String,
        amount_expr: String,
        comment: String,
    },
}

/// Parse incoming message text.
///
/// Returns `None` for anything that is not a command (plain chatter is
/// ignored), `Some(Err(usage))` for a recognized command with malformed
/// arguments, and `Some(Ok(command))` otherwise.
pub fn parse_command(text: &str) -> Option<Result<Command, String>> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return None;
    }

    let (head, args) = split_first(rest);
    let parsed = match head.to_ascii_lowercase().as_str() {
        "start" | "help" => Ok(Command::Help),
        "add" => match first_word(args) {
            Some(name) => Ok(Command::AddAccount { name: name.to_string() }),
            None => Err("Usage: /add usd".to_string()),
        },
        "delete" => match first_word(args) {
            Some(name) => Ok(Command::DeleteAccount { name: name.to_string() }),
            None => Err("Usage: /delete usd".to_string()),
        },
        "give" => Ok(Command::ShowBalances),
        "rate" => {
            let (pair, rest) = split_first(args);
            let amount = first_word(rest);
            match (pair.is_empty(), amount) {
                (false, Some(amount)) => match amount.parse::<f64>() {
                    Ok(amount) if amount.is_finite() => Ok(Command::ConvertRate {
                        pair: pair.to_string(),
                        amount,
                    }),
                    _ => Err("Usage: /rate eurusd 100".to_string()),
                },
                _ => Err("Usage: /rate eurusd 100".to_string()),
            }
        }
        account => {
            let (amount_expr, comment) = split_first(args);
            if amount_expr.is_empty() {
                Err(format!("Usage: /{} 100 salary", account))
            } else {
                Ok(Command::Record {
                    account: account.to_string(),
                    amount_expr: amount_expr.to_string(),
                    comment: comment.to_string(),
                })
            }
        }
    };
    Some(parsed)
}

/// Split off the first whitespace-separated token; the remainder keeps
/// its internal spacing (comments are free text).
fn split_first(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text.trim_end(), ""),
    }
}

fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Help text listing the command surface.
pub fn help_text() -> String {
    [
        "/add [account] - add account",
        "/delete [account] - delete account",
        "/give - show balances",
        "/[account] [amount expr] [comment] - add record",
        "/rate eurusd 100 - currency conversion",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(text: &str) -> Command {
        parse_command(text).expect("should be a command").expect("should parse")
    }

    fn usage(text: &str) -> String {
        parse_command(text)
            .expect("should be a command")
            .expect_err("should be a usage error")
    }

    #[test]
    fn test_help_commands() {
        assert_eq!(ok("/start"), Command::Help);
        assert_eq!(ok("/help"), Command::Help);
    }

    #[test]
    fn test_add_and_delete() {
        assert_eq!(ok("/add usd"), Command::AddAccount { name: "usd".into() });
        assert_eq!(ok("/delete usd"), Command::DeleteAccount { name: "usd".into() });
        assert_eq!(usage("/add"), "Usage: /add usd");
        assert_eq!(usage("/delete"), "Usage: /delete usd");
    }

    #[test]
    fn test_give() {
        assert_eq!(ok("/give"), Command::ShowBalances);
    }

    #[test]
    fn test_rate() {
        assert_eq!(
            ok("/rate eurusd 100"),
            Command::ConvertRate { pair: "eurusd".into(), amount: 100.0 }
        );
        assert_eq!(usage("/rate"), "Usage: /rate eurusd 100");
        assert_eq!(usage("/rate eurusd"), "Usage: /rate eurusd 100");
        assert_eq!(usage("/rate eurusd lots"), "Usage: /rate eurusd 100");
    }

    #[test]
    fn test_record_form() {
        assert_eq!(
            ok("/usd 100 salary"),
            Command::Record {
                account: "usd".into(),
                amount_expr: "100".into(),
                comment: "salary".into(),
            }
        );
        assert_eq!(
            ok("/usd -20%"),
            Command::Record {
                account: "usd".into(),
                amount_expr: "-20%".into(),
                comment: "".into(),
            }
        );
        assert_eq!(
            ok("/usd 2*(3+4) multi word comment"),
            Command::Record {
                account: "usd".into(),
                amount_expr: "2*(3+4)".into(),
                comment: "multi word comment".into(),
            }
        );
        assert_eq!(usage("/usd"), "Usage: /usd 100 salary");
    }

    #[test]
    fn test_non_commands_are_ignored() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/ detached"), None);
        assert_eq!(parse_command("just / text"), None);
    }
}
