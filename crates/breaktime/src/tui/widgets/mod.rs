pub(super) mod break_overlay;
pub(super) mod settings;
pub(super) mod status;
pub(super) mod util;
