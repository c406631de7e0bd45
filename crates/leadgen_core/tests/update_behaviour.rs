mod common;

use common::{fixed_clock, google_input, init_logging, status_frame};
use leadgen_core::{
    update, Campaign, CampaignInput, CampaignState, ChannelMode, Effect, LaunchError, Msg,
    ProtocolError, ProtocolMessage, Target, ValidationError,
};
use pretty_assertions::assert_eq;

fn campaign(mode: ChannelMode) -> Campaign {
    init_logging();
    Campaign::with_clock(mode, fixed_clock())
}

fn launched(mode: ChannelMode) -> (Campaign, u64) {
    let (state, effects) = update(campaign(mode), Msg::LaunchRequested(google_input()));
    match effects.as_slice() {
        [Effect::OpenChannel { channel, .. }] => (state, *channel),
        other => panic!("expected a single OpenChannel effect, got {other:?}"),
    }
}

#[test]
fn stray_close_while_idle_changes_nothing() {
    let state = campaign(ChannelMode::Streaming);
    let before = state.view();

    let (mut next, effects) = update(state, Msg::ChannelClosed { channel: 1 });

    assert_eq!(next.view(), before);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn launch_emits_open_channel_with_validated_request() {
    let input = CampaignInput {
        recency_minutes: "30".to_string(),
        ..google_input()
    };
    let (mut state, effects) = update(campaign(ChannelMode::Streaming), Msg::LaunchRequested(input));

    let request = match effects.as_slice() {
        [Effect::OpenChannel { channel: 1, request }] => request.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    assert_eq!(request.mode, ChannelMode::Streaming);
    assert_eq!(request.parameters.recency_minutes(), Some(30));
    assert_eq!(
        state.parameters().map(|p| p.company()),
        Some("Google")
    );
    assert!(state.consume_dirty());
}

#[test]
fn channel_ids_are_never_reused() {
    let (state, first) = launched(ChannelMode::Streaming);
    let (state, _) = update(
        state,
        Msg::MessageReceived {
            channel: first,
            message: Ok(ProtocolMessage::Result { data: Vec::new() }),
        },
    );
    let (_state, effects) = update(state, Msg::LaunchRequested(google_input()));

    assert!(matches!(
        effects.as_slice(),
        [Effect::OpenChannel { channel, .. }] if *channel == first + 1
    ));
}

#[test]
fn terminal_messages_emit_exactly_one_close() {
    let (state, channel) = launched(ChannelMode::Streaming);

    let (state, effects) = update(
        state,
        Msg::MessageReceived {
            channel,
            message: Ok(ProtocolMessage::Error {
                message: "blocked".to_string(),
            }),
        },
    );
    assert_eq!(effects, vec![Effect::CloseChannel { channel }]);
    assert_eq!(state.state(), CampaignState::Error);

    let (state, effects) = update(
        state,
        Msg::TransportFailed {
            channel,
            reason: "reset".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.state(), CampaignState::Error);
}

#[test]
fn decoded_protocol_errors_fail_the_campaign() {
    let (state, channel) = launched(ChannelMode::Streaming);

    let (state, effects) = update(
        state,
        Msg::MessageReceived {
            channel,
            message: Err(ProtocolError::InvalidJson("expected value".to_string())),
        },
    );

    assert_eq!(effects, vec![Effect::CloseChannel { channel }]);
    assert_eq!(state.state(), CampaignState::Error);
    assert_eq!(
        state.logs().last().unwrap().message,
        "Malformed agent message: payload is not valid JSON: expected value"
    );
}

#[test]
fn status_messages_never_change_state() {
    let (mut state, channel) = launched(ChannelMode::Streaming);
    for i in 0..5 {
        let (next, effects) = update(
            state,
            Msg::FrameReceived {
                channel,
                payload: status_frame(&format!("step {i}")),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(next.state(), CampaignState::Running);
        state = next;
    }
    assert_eq!(state.logs().len(), 6);
    assert_eq!(state.logs().entries()[5].message, "> step 4");
}

#[test]
fn launch_validation_happens_before_any_effect() {
    let input = CampaignInput {
        target: Target::Recruiters,
        ..google_input()
    };
    let (state, effects) = update(campaign(ChannelMode::Streaming), Msg::LaunchRequested(input));

    assert_eq!(state.state(), CampaignState::Idle);
    assert_eq!(
        effects,
        vec![Effect::LaunchRejected(LaunchError::Invalid(
            ValidationError::UnsupportedTarget {
                target: Target::Recruiters,
                mode: ChannelMode::Streaming,
            }
        ))]
    );
}

#[test]
fn reset_from_idle_is_accepted() {
    let (state, effects) = update(campaign(ChannelMode::Request), Msg::ResetRequested);
    assert!(effects.is_empty());
    assert_eq!(state.state(), CampaignState::Idle);
}
