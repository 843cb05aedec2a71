//! Names of the standard operations.

pub const BIND_TOOLTIP: &str = "bind_tooltip";
pub const UNBIND_TOOLTIP: &str = "unbind_tooltip";
pub const OPEN_TOOLTIP: &str = "open_tooltip";
pub const CLOSE_TOOLTIP: &str = "close_tooltip";
pub const TOGGLE_TOOLTIP: &str = "toggle_tooltip";

pub const BIND_POPUP: &str = "bind_popup";
pub const UNBIND_POPUP: &str = "unbind_popup";
pub const OPEN_POPUP: &str = "open_popup";
pub const CLOSE_POPUP: &str = "close_popup";
pub const TOGGLE_POPUP: &str = "toggle_popup";

pub const BRING_TO_BACK: &str = "bring_to_back";
pub const BRING_TO_FRONT: &str = "bring_to_front";
pub const SET_STYLE: &str = "set_style";
pub const REDRAW: &str = "redraw";
pub const UPDATE: &str = "update";

pub const SET_Z_INDEX_OFFSET: &str = "set_z_index_offset";
pub const SET_ICON: &str = "set_icon";
pub const SET_OPACITY: &str = "set_opacity";

pub const SET_LAT_LNG: &str = "set_lat_lng";
pub const SET_RADIUS: &str = "set_radius";

pub const ADD_LAT_LNG: &str = "add_lat_lng";
pub const SET_LAT_LNGS: &str = "set_lat_lngs";
pub const CONVERT_LAT_LNGS: &str = "convert_lat_lngs";

pub const BOUNDS_TO_LAT_LNGS: &str = "bounds_to_lat_lngs";
pub const SET_BOUNDS: &str = "set_bounds";
