use engine::{Money, MoneyError};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    #[error("Please send a number, e.g. 12.50")]
    NotANumber,
    #[error("Use at most two decimals")]
    TooManyDecimals,
    #[error("The amount must be greater than zero")]
    NotPositive,
    #[error("The amount must not exceed {}", Money::MAX_AMOUNT)]
    TooLarge,
}

impl From<MoneyError> for ParseError {
    fn from(value: MoneyError) -> Self {
        match value {
            MoneyError::Empty | MoneyError::Invalid => Self::NotANumber,
            MoneyError::TooManyDecimals => Self::TooManyDecimals,
            MoneyError::NotPositive => Self::NotPositive,
            MoneyError::Overflow | MoneyError::TooLarge => Self::TooLarge,
        }
    }
}

/// Parses a typed amount, accepting `.` or `,` and ignoring spaces.
pub(crate) fn parse_amount(input: &str) -> Result<Money, ParseError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(Money::parse_amount(&compact)?)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Help,
}

/// Parses `/command` or `/command@botname`; unknown commands yield `None`.
pub(crate) fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    match name.to_ascii_lowercase().as_str() {
        "start" | "menu" => Some(Command::Start),
        "help" => Some(Command::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_common_spellings() {
        assert_eq!(parse_amount("12.5"), Ok(Money::new(1250)));
        assert_eq!(parse_amount("12,50"), Ok(Money::new(1250)));
        assert_eq!(parse_amount(" 1 200 "), Ok(Money::new(120_000)));
    }

    #[test]
    fn amounts_report_the_failure() {
        assert_eq!(parse_amount("abc"), Err(ParseError::NotANumber));
        assert_eq!(parse_amount(""), Err(ParseError::NotANumber));
        assert_eq!(parse_amount("1.234"), Err(ParseError::TooManyDecimals));
        assert_eq!(parse_amount("0"), Err(ParseError::NotPositive));
        assert_eq!(parse_amount("-3"), Err(ParseError::NotPositive));
        assert_eq!(parse_amount("1000000000.01"), Err(ParseError::TooLarge));
        assert_eq!(parse_amount("99999999999999999999"), Err(ParseError::TooLarge));
        assert_eq!(parse_amount("1,2,3"), Err(ParseError::NotANumber));
        assert_eq!(parse_amount("-"), Err(ParseError::NotANumber));
    }

    #[test]
    fn every_money_error_has_a_message() {
        let cases = [
            (MoneyError::Empty, ParseError::NotANumber),
            (MoneyError::Invalid, ParseError::NotANumber),
            (MoneyError::TooManyDecimals, ParseError::TooManyDecimals),
            (MoneyError::Overflow, ParseError::TooLarge),
            (MoneyError::NotPositive, ParseError::NotPositive),
            (MoneyError::TooLarge, ParseError::TooLarge),
        ];
        for (money, parse) in cases {
            assert_eq!(ParseError::from(money), parse);
        }
    }

    #[test]
    fn commands() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/start@tally_bot"), Some(Command::Start));
        assert_eq!(parse_command("/START extra"), Some(Command::Start));
        assert_eq!(parse_command("/help"), Some(Command::Help));
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command("start"), None);
        assert_eq!(parse_command("/"), None);
    }
}
