#![allow(unused_imports)]

use tape_portal::{
    composite, deferred, fit_to_width, generate_name, resolve_content_box, use_portal,
    visible_width, Align, Area, BackHandler, BackSubscription, Closeable, CloseableRef, Closer,
    ContentBox, ContextError, Deferred, EnvConfig, ManagerOptions, MountContext, NoKeyboard,
    Orientation, OverlayConfig, ParseOrientationError, PointerEvents, PortalComponent,
    PortalContext, PortalEntry, PortalError, PortalErrorCode, PortalEvent, PortalHandle, PortalId,
    PortalManager, PortalProps, PortalProvider, PortalRequest, PortalResult, PortalShow,
    PortalStore, PortalSurface, PressOutcome, ProviderScope, RenderedPortal, Renderable,
    Snapshot, SoftKeyboard, StateSink, StoreSubscription, BACK_KEY_ID, DEFAULT_BG_COLOR,
    DEFAULT_NAME_PREFIX,
};

#[test]
fn public_api_exports_compile() {}
