use super::*;

fn select(asset: &str, ticket: u64) -> CanvasEvent {
    CanvasEvent::Select {
        asset: AssetId::new(asset),
        ticket: LoadTicket(ticket),
    }
}

#[test]
fn first_load_reaches_ready() {
    let t = CanvasState::Uninitialized.next(select("a", 1));
    assert!(t.effects.is_empty());
    assert_eq!(t.state.pending_ticket(), Some(LoadTicket(1)));

    let t = t.state.next(CanvasEvent::Loaded(LoadTicket(1)));
    assert_eq!(
        t.state,
        CanvasState::Ready {
            asset: AssetId::new("a")
        }
    );
    assert_eq!(t.effects, vec![Effect::Attach]);
}

#[test]
fn switching_persists_before_teardown() {
    let ready = CanvasState::Ready {
        asset: AssetId::new("a"),
    };
    let t = ready.next(select("b", 2));
    assert_eq!(
        t.effects,
        vec![Effect::Persist(AssetId::new("a")), Effect::TearDown]
    );
    assert_eq!(t.state.asset(), Some(&AssetId::new("b")));
    assert!(!t.state.is_ready());
}

#[test]
fn stale_completion_is_ignored() {
    let loading = CanvasState::Uninitialized
        .next(select("a", 1))
        .state
        .next(select("b", 2))
        .state;

    let t = loading.next(CanvasEvent::Loaded(LoadTicket(1)));
    assert_eq!(t.effects, vec![Effect::IgnoreStale]);
    assert_eq!(t.state, loading);

    let t = loading.next(CanvasEvent::Failed(LoadTicket(1)));
    assert_eq!(t.effects, vec![Effect::IgnoreStale]);

    let t = loading.next(CanvasEvent::Loaded(LoadTicket(2)));
    assert_eq!(t.state.asset(), Some(&AssetId::new("b")));
    assert!(t.state.is_ready());
}

#[test]
fn failed_load_shows_not_available() {
    let t = CanvasState::Uninitialized
        .next(select("a", 1))
        .state
        .next(CanvasEvent::Failed(LoadTicket(1)));
    assert_eq!(
        t.state,
        CanvasState::NotAvailable {
            asset: AssetId::new("a")
        }
    );
    assert_eq!(t.effects, vec![Effect::ShowNotAvailable]);

    // Nothing to persist from an unavailable asset.
    let t = t.state.next(select("b", 2));
    assert_eq!(t.effects, vec![Effect::TearDown]);
}

#[test]
fn tag_change_repaints_only_when_ready() {
    let ready = CanvasState::Ready {
        asset: AssetId::new("a"),
    };
    assert_eq!(
        ready.next(CanvasEvent::TagsChanged).effects,
        vec![Effect::Repaint]
    );
    assert!(
        CanvasState::Uninitialized
            .next(CanvasEvent::TagsChanged)
            .effects
            .is_empty()
    );
}

#[test]
fn unmount_persists_ready_asset() {
    let ready = CanvasState::Ready {
        asset: AssetId::new("a"),
    };
    let t = ready.next(CanvasEvent::Unmount);
    assert_eq!(t.state, CanvasState::Uninitialized);
    assert_eq!(
        t.effects,
        vec![Effect::Persist(AssetId::new("a")), Effect::TearDown]
    );
}
