//! Chooses which upstream context a new request continues from.

use dprovider::{ModelVariant, RequestOptions};

use crate::Turn;

/// Builds the options for a new request from the turns committed before it.
///
/// Only the most recent respondable turn is considered. A pending or context-less predecessor
/// yields no context rather than reaching further back.
pub fn resolve_context(
    prior_turns: &[Turn],
    context_enabled: bool,
    is_image_mode: bool,
    model_variant: ModelVariant,
) -> RequestOptions {
    let options = RequestOptions::new(is_image_mode, model_variant);
    if !context_enabled {
        return options;
    }

    let carried = prior_turns
        .iter()
        .rev()
        .find(|turn| turn.is_respondable())
        .and_then(|turn| turn.response_context.clone());

    match carried {
        Some(context) => options.with_context(context),
        None => options,
    }
}

#[cfg(test)]
mod tests {
    use dprovider::ResponseContext;

    use super::*;
    use crate::TurnPatch;

    fn settled_with(context: ResponseContext) -> Turn {
        let mut turn = Turn::assistant_placeholder(
            "t",
            "q",
            RequestOptions::new(false, ModelVariant::Chat),
        );
        turn.apply(TurnPatch::settled("a", Some(context)));
        turn
    }

    fn failed() -> Turn {
        let mut turn = Turn::assistant_placeholder(
            "t",
            "q",
            RequestOptions::new(false, ModelVariant::Chat),
        );
        turn.apply(TurnPatch::failed("boom"));
        turn
    }

    #[test]
    fn carries_the_last_settled_context_when_enabled() {
        let older = ResponseContext::new().with("parent_message_id", "m-1");
        let newer = ResponseContext::new().with("parent_message_id", "m-2");
        let turns = vec![
            Turn::user("t", "q1", false),
            settled_with(older),
            Turn::user("t", "q2", false),
            settled_with(newer.clone()),
            Turn::user("t", "q3", false),
            failed(),
        ];

        let options = resolve_context(&turns, true, true, ModelVariant::Midjourney);
        assert_eq!(options.context, Some(newer));
        assert!(options.is_image_mode);
        assert_eq!(options.model_variant, ModelVariant::Midjourney);
    }

    #[test]
    fn disabled_flag_or_no_history_yields_no_context() {
        let turns = vec![
            Turn::user("t", "q", false),
            settled_with(ResponseContext::new().with("k", "v")),
        ];

        assert_eq!(
            resolve_context(&turns, false, false, ModelVariant::Chat),
            RequestOptions::new(false, ModelVariant::Chat)
        );
        assert_eq!(
            resolve_context(&[], true, false, ModelVariant::Chat),
            RequestOptions::new(false, ModelVariant::Chat)
        );
    }

    #[test]
    fn pending_predecessor_does_not_reach_further_back() {
        let turns = vec![
            Turn::user("t", "q1", false),
            settled_with(ResponseContext::new().with("k", "v")),
            Turn::user("t", "q2", false),
            Turn::assistant_placeholder("t", "q2", RequestOptions::new(false, ModelVariant::Chat)),
        ];

        let options = resolve_context(&turns, true, false, ModelVariant::Chat);
        assert!(!options.carries_context());
    }

    #[test]
    fn settled_turn_without_context_yields_none() {
        let mut turn = Turn::assistant_placeholder(
            "t",
            "q",
            RequestOptions::new(false, ModelVariant::Chat),
        );
        turn.apply(TurnPatch::settled("a", None));

        let options = resolve_context(&[turn], true, false, ModelVariant::Chat);
        assert_eq!(options.context, None);
    }
}
