//! Directive extraction.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::cleanup::tidy;
use crate::directive::{HeatDirective, HeatLevel, ParsedInstruction, TimerDirective};

// [ACTION: SET_TIMER | TIME: 3m | LABEL: "SIZZLING ONIONS"]
static TIMER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\[ACTION:\s*SET_TIMER\s*\|\s*TIME:\s*([0-9]+)\s*m\s*\|\s*LABEL:\s*"([^"]+)"\s*\]"#,
    )
    .expect("valid timer token regex")
});

// [HEAT: 🔥🔥🔥 (Searing!)], [HEAT: 🔥 🔥 (Steady)], [HEAT:🔥(Low)], [HEAT: N/A]
static HEAT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[HEAT:\s*((?:🔥\s*){1,3}|N/A)\s*(?:\(([^)]+)\))?\s*\]")
        .expect("valid heat token regex")
});

/// Parses a raw micro-step instruction.
///
/// The first well-formed timer token and the first heat token become the
/// returned directives. Every well-formed token is removed from the
/// display text, so parsing the clean text again finds nothing and
/// changes nothing. Malformed tokens stay in the text untouched.
#[must_use]
pub fn parse(raw_instruction: &str) -> ParsedInstruction {
    let mut text = raw_instruction.to_owned();
    let timer = take_first(&TIMER_TOKEN, &mut text, timer_from);
    let heat = take_first(&HEAT_TOKEN, &mut text, heat_from);

    ParsedInstruction {
        clean_instruction: finish(text),
        timer,
        heat,
    }
}

/// Removes the first match that `extract` accepts and returns its value.
fn take_first<T>(
    token: &Regex,
    text: &mut String,
    extract: fn(&Captures<'_>) -> Option<T>,
) -> Option<T> {
    let (range, value) = token.captures_iter(text.as_str()).find_map(|caps| {
        let whole = caps.get(0)?;
        extract(&caps).map(|value| (whole.range(), value))
    })?;
    text.replace_range(range, "");
    Some(value)
}

fn timer_from(caps: &Captures<'_>) -> Option<TimerDirective> {
    let minutes: u32 = caps.get(1)?.as_str().parse().ok()?;
    if minutes == 0 || minutes.checked_mul(60).is_none() {
        return None;
    }
    Some(TimerDirective {
        minutes,
        label: caps.get(2)?.as_str().trim().to_owned(),
    })
}

fn heat_from(caps: &Captures<'_>) -> Option<HeatDirective> {
    let raw_level = caps.get(1)?.as_str().trim();
    if raw_level.eq_ignore_ascii_case("N/A") {
        return Some(HeatDirective {
            level: HeatLevel::NotApplicable,
            label: String::new(),
        });
    }

    let flames = raw_level.chars().filter(|c| !c.is_whitespace()).count();
    Some(HeatDirective {
        level: HeatLevel::Flames(u8::try_from(flames).ok()?),
        label: caps
            .get(2)
            .map(|label| label.as_str().trim().to_owned())
            .unwrap_or_default(),
    })
}

/// Strips every remaining well-formed token, repeating in case a removal
/// splices a new token together.
fn strip_tokens(text: &str) -> String {
    let mut current = text.to_owned();
    loop {
        let without_timers = TIMER_TOKEN
            .replace_all(&current, |caps: &Captures<'_>| {
                if timer_from(caps).is_some() {
                    String::new()
                } else {
                    caps[0].to_owned()
                }
            })
            .into_owned();
        let stripped = HEAT_TOKEN.replace_all(&without_timers, "").into_owned();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Strips and tidies until the text is stable.
///
/// After the first pass a further pass can only drop leading quotes or a
/// leading stop, so the text shrinks on every pass that changes it.
fn finish(text: String) -> String {
    let mut current = text;
    let mut first_pass = true;
    loop {
        let next = tidy(&strip_tokens(&current));
        if next == current || (!first_pass && next.len() >= current.len()) {
            return next;
        }
        current = next;
        first_pass = false;
    }
}
