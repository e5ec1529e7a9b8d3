use futures_util::FutureExt;
use pretty_assertions::assert_eq;
use tape_portal::{
    composite, use_portal, Area, BackHandler, OverlayConfig, PortalProps, PortalProvider,
    PortalRequest, PortalStore, PortalSurface, StateSink,
};

const AREA: Area = Area { cols: 12, rows: 3 };

fn label(text: &'static str) -> PortalRequest<()> {
    PortalRequest::from_fn(move |props: &PortalProps<()>, _width| {
        vec![format!("{text}#{}", props.index)]
    })
}

#[test]
fn renders_in_ascending_index_order() {
    let provider = PortalProvider::new();
    let context = provider.context();
    for (name, index) in [("five", 5), ("one", 1), ("three", 3)] {
        let _shown = context.show(label(name).name(name).index(index));
    }

    let rendered = provider.render(AREA);
    let keys: Vec<&str> = rendered.iter().map(|portal| portal.key.as_str()).collect();
    assert_eq!(keys, vec!["one_1", "three_3", "five_5"]);
    assert_eq!(rendered[2].lines, vec!["five#5"]);
}

#[test]
fn nothing_live_renders_nothing() {
    let provider = PortalProvider::new();
    assert!(provider.render(AREA).is_empty());

    let shown = provider.context().show(label("gone"));
    shown.handle.resolve(());
    assert!(provider.render(AREA).is_empty());
}

#[test]
fn reused_name_renders_fresh_content() {
    let provider = PortalProvider::new();
    let context = provider.context();

    let first = context.show(label("first").name("toast").index(0));
    assert_eq!(provider.render(AREA)[0].lines, vec!["first#0"]);
    first.handle.resolve(());

    let _second = context.show(label("second").name("toast").index(0));
    let rendered = provider.render(AREA);
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].key, "toast_0");
    assert_eq!(rendered[0].lines, vec!["second#0"]);
}

#[test]
fn composite_paints_layers_over_base() {
    let provider = PortalProvider::new();
    let context = provider.context();
    let _low = context.show(label("low").name("low").index(0));
    let _top = context.show(
        label("top")
            .name("top")
            .index(1)
            .overlay(OverlayConfig::new()),
    );

    let base = vec!["transcript".to_string(); 3];
    let frame = composite(&base, &provider.render(AREA), AREA);
    assert_eq!(frame, vec!["            ", "   top#1    ", "            "]);
}

#[test]
fn surface_can_render_any_store() {
    let store = PortalStore::new();
    let manager = tape_portal::PortalManager::new(store.clone());
    let mut surface = PortalSurface::new(BackHandler::new());

    let shown = manager.show(label("screen").name("screen"));
    surface.sync(&store.snapshot());
    assert_eq!(surface.keys(), vec!["screen_0"]);

    manager.remove("screen");
    surface.sync(&store.snapshot());
    assert!(surface.is_empty());
    assert!(shown.result.now_or_never().is_none());
}

#[test]
fn use_portal_reaches_entered_provider() {
    let provider = PortalProvider::new();
    let _scope = provider.enter();

    let _shown = use_portal().show(label("hello").name("hello"));
    assert_eq!(provider.render(AREA)[0].key, "hello_0");

    use_portal().remove("hello");
    assert!(provider.render(AREA).is_empty());
}

#[test]
#[should_panic(expected = "PortalProvider")]
fn use_portal_outside_provider_panics() {
    let _ = use_portal();
}
