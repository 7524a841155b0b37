//! Transport commands typed on stdin.

use anyhow::{Context, Result, anyhow, bail};
use readaloud_core::{Direction, Message};

#[derive(Debug, Clone)]
pub enum Command {
    Reader(Message),
    Quit,
}

pub const HELP: &str = "commands: play | stop | toggle | next | prev | next-chapter | \
prev-chapter | chapter N | jump N | rate R | voice NAME|default | quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let message = match verb.to_ascii_lowercase().as_str() {
        "play" => Message::Play,
        "stop" => Message::Stop,
        "toggle" | "p" => Message::Toggle,
        "next" | "n" => Message::StepParagraph(Direction::Forward),
        "prev" => Message::StepParagraph(Direction::Backward),
        "next-chapter" => Message::SkipChapter(Direction::Forward),
        "prev-chapter" => Message::SkipChapter(Direction::Backward),
        "chapter" => Message::SwitchChapter(
            chapter_number(required(verb, arg)?)?,
        ),
        "jump" => {
            let raw = required(verb, arg)?;
            let idx = raw
                .parse::<usize>()
                .with_context(|| format!("Invalid paragraph index: {raw}"))?;
            Message::JumpTo(idx)
        }
        "rate" => {
            let raw = required(verb, arg)?;
            let rate = raw
                .parse::<f32>()
                .with_context(|| format!("Invalid speech rate: {raw}"))?;
            if !rate.is_finite() {
                bail!("Invalid speech rate: {raw}");
            }
            Message::SetRate(rate)
        }
        "voice" => match required(verb, arg)? {
            "default" => Message::SetVoice(None),
            name => Message::SetVoice(Some(name.to_string())),
        },
        "quit" | "q" | "exit" => return Ok(Some(Command::Quit)),
        other => bail!("Unknown command: {other}"),
    };
    Ok(Some(Command::Reader(message)))
}

fn required<'a>(verb: &str, arg: Option<&'a str>) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("`{verb}` needs an argument"))
}

/// 1-based chapter number to chapter index.
pub fn chapter_number(raw: &str) -> Result<usize> {
    let number = raw
        .parse::<usize>()
        .with_context(|| format!("Invalid chapter number: {raw}"))?;
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Chapter numbers start at 1"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(line: &str) -> Message {
        match parse_command(line) {
            Ok(Some(Command::Reader(message))) => message,
            other => panic!("unexpected parse for {line:?}: {other:?}"),
        }
    }

    #[test]
    fn parses_transport_verbs() {
        assert!(matches!(reader("play"), Message::Play));
        assert!(matches!(reader("  STOP "), Message::Stop));
        assert!(matches!(
            reader("next"),
            Message::StepParagraph(Direction::Forward)
        ));
        assert!(matches!(
            reader("prev-chapter"),
            Message::SkipChapter(Direction::Backward)
        ));
        assert!(matches!(reader("jump 12"), Message::JumpTo(12)));
        assert!(matches!(reader("chapter 3"), Message::SwitchChapter(2)));
    }

    #[test]
    fn parses_voice_settings() {
        assert!(matches!(reader("rate 1.5"), Message::SetRate(rate) if rate == 1.5));
        assert!(matches!(reader("voice default"), Message::SetVoice(None)));
        assert!(
            matches!(reader("voice en-GB"), Message::SetVoice(Some(ref name)) if name == "en-GB")
        );
    }

    #[test]
    fn blank_and_quit_lines() {
        assert!(parse_command("   ").unwrap().is_none());
        assert!(matches!(parse_command("quit"), Ok(Some(Command::Quit))));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("dance").is_err());
        assert!(parse_command("jump").is_err());
        assert!(parse_command("jump -1").is_err());
        assert!(parse_command("rate fast").is_err());
        assert!(parse_command("rate NaN").is_err());
        assert!(parse_command("chapter 0").is_err());
    }
}
