use std::io::{self, BufRead, Write};

use finlit_core::model::{QuestionRecord, SessionState, SetupError, SetupForm};
use rand::Rng;
use services::{AvatarSelector, Clock, SessionError, SetupService};
use tracing::warn;

/// Print `text` and read one trimmed line; `None` once the input is exhausted.
pub fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Apply a typed avatar answer: a 1-based catalog number or an emoji.
///
/// Rejected answers are logged and leave the previous choice in place.
pub fn choose_avatar(selector: &mut AvatarSelector, state: &mut SessionState, raw: &str) {
    let outcome = match raw.trim().parse::<usize>() {
        Ok(number) if number >= 1 => selector.pick_catalog(state, number - 1),
        _ => selector.type_emoji(state, raw),
    };
    if let Err(err) = outcome {
        warn!("avatar not accepted: {err}");
    }
}

fn avatar_prompt() -> String {
    let catalog: Vec<String> = AvatarSelector::catalog()
        .iter()
        .enumerate()
        .map(|(i, emoji)| format!("{}:{emoji}", i + 1))
        .collect();
    format!("Avatar ({}) or type an emoji: ", catalog.join(" "))
}

/// Everything the setup form needs besides the session itself.
pub struct SetupRequest<'a> {
    pub name: Option<String>,
    pub country: String,
    pub pool: &'a [QuestionRecord],
    pub service: &'a SetupService,
    pub clock: &'a Clock,
}

/// Keep asking for the missing pieces until setup goes through.
///
/// An incomplete form is reported and asked for again. Returns `Ok(false)`
/// if the input ends before setup completes.
///
/// # Errors
///
/// Returns an error when the prompt cannot be written or read, or when setup
/// fails for a reason other than a missing username or avatar.
pub fn complete_setup<R, W, G>(
    input: &mut R,
    out: &mut W,
    state: &mut SessionState,
    selector: &mut AvatarSelector,
    request: SetupRequest<'_>,
    rng: &mut G,
) -> Result<bool, Box<dyn std::error::Error>>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let SetupRequest {
        mut name,
        country,
        pool,
        service,
        clock,
    } = request;

    loop {
        let current = match name.take() {
            Some(current) => current,
            None => match read_answer(input, out, "Your name: ")? {
                Some(current) => current,
                None => return Ok(false),
            },
        };

        if state.avatar().is_none() {
            let Some(raw) = read_answer(input, out, &avatar_prompt())? else {
                return Ok(false);
            };
            choose_avatar(selector, state, &raw);
        }

        let form = SetupForm::new(current.clone(), country.clone());
        match service.submit(state, form, pool, rng, clock.now()) {
            Ok(()) => return Ok(true),
            Err(err) if err.is_setup_incomplete() => {
                warn!("setup incomplete: {err}");
                writeln!(out, "{err}, please try again")?;
                if !matches!(err, SessionError::Setup(SetupError::MissingUsername)) {
                    name = Some(current);
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlit_core::model::{Avatar, QuestionDraft};
    use finlit_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use services::EMOJI_CATALOG;
    use std::io::Cursor;

    fn pool() -> Vec<QuestionRecord> {
        vec![
            QuestionDraft::new("Needs share?", ["50%", "30%"], "50%")
                .validate()
                .unwrap(),
        ]
    }

    fn run(state: &mut SessionState, name: Option<&str>, typed: &str) -> (bool, String) {
        let pool = pool();
        let mut input = Cursor::new(typed.to_owned());
        let mut out = Vec::new();
        let mut selector = AvatarSelector::new();
        let mut rng = StdRng::seed_from_u64(3);
        let service = SetupService::default();
        let clock = Clock::fixed(fixed_now());
        let done = complete_setup(
            &mut input,
            &mut out,
            state,
            &mut selector,
            SetupRequest {
                name: name.map(str::to_owned),
                country: "NZ".into(),
                pool: &pool,
                service: &service,
                clock: &clock,
            },
            &mut rng,
        )
        .unwrap();
        (done, String::from_utf8(out).unwrap())
    }

    #[test]
    fn blank_names_are_asked_for_again() {
        let mut state = SessionState::new(fixed_now());
        state.set_avatar(Avatar::emoji("🦊").unwrap()).unwrap();

        let (done, out) = run(&mut state, Some("   "), "\n   \nAna\n");

        assert!(done);
        assert_eq!(state.profile().unwrap().username(), "Ana");
        assert_eq!(out.matches("Your name: ").count(), 3);
        assert_eq!(out.matches("please try again").count(), 3);
    }

    #[test]
    fn missing_avatar_keeps_the_name() {
        let mut state = SessionState::new(fixed_now());

        let (done, out) = run(&mut state, Some("Ana"), "   \n3\n");

        assert!(done);
        assert_eq!(state.avatar(), Some(&Avatar::Emoji(EMOJI_CATALOG[2].into())));
        assert_eq!(state.profile().unwrap().username(), "Ana");
        assert!(!out.contains("Your name: "));
    }

    #[test]
    fn exhausted_input_leaves_setup_open() {
        let mut state = SessionState::new(fixed_now());
        state.set_avatar(Avatar::emoji("🦊").unwrap()).unwrap();

        let (done, _) = run(&mut state, Some(""), "\n");

        assert!(!done);
        assert!(!state.is_configured());
    }
}
