//! Shared test helpers for fixture-driven snapshot tests.

#[doc(hidden)]
pub use insta as _insta;

pub mod normalize;

/// Assert that a value matches a snapshot stored next to its fixture file.
/// If the snapshot does not exist, it is created in the fixture's directory.
#[macro_export]
macro_rules! snap_test {
    ($value:expr, $fixture_path:expr) => {
        let normalized_value = $crate::normalize::normalize_newlines($value.as_str());
        let fixture_path = ::std::path::Path::new($fixture_path);
        let fixture_dir = fixture_path.parent().unwrap();
        let fixture_name = fixture_path.file_stem().unwrap().to_str().unwrap();

        let mut settings = $crate::_insta::Settings::new();
        settings.set_snapshot_path(fixture_dir);
        settings.set_input_file(fixture_path);
        settings.set_prepend_module_to_snapshot(false);
        settings.set_omit_expression(true);
        settings.bind(|| {
            $crate::_insta::assert_snapshot!(fixture_name, normalized_value);
        });
    };
}
