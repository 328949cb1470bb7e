
pub use app::{body_json, form_post, get, make_test_app, make_user};
