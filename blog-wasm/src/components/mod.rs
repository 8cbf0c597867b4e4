pub(crate) mod auth_panel;
pub(crate) mod comments;
pub(crate) mod pagination;
pub(crate) mod post_editor;
pub(crate) mod post_list;
pub(crate) mod post_show;
