//! Loader for the optional native title cleaner library.
//!
//! The library exports `void clean_title(const char *input, char *output)`,
//! where `output` points to a buffer of [`CLEAN_BUFFER_SIZE`] bytes.

use std::ffi::{CString, c_char};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;

use crate::media_sort::title::{
    AcceleratedNormalizer, CLEAN_BUFFER_SIZE, DefaultNormalizer, TitleCleaner, TitleNormalizer,
};
use crate::media_sort::{Error, Result};

const LIBRARY_NAME: &str = "title_cleaner";
const SYMBOL_NAME: &[u8] = b"clean_title\0";

type CleanTitleFn = unsafe extern "C" fn(input: *const c_char, output: *mut c_char);

/// Dynamically loaded `clean_title` routine.
#[derive(Debug)]
pub struct NativeCleaner {
    function: CleanTitleFn,
    // Owns the code `function` points to.
    _library: Library,
}

impl NativeCleaner {
    /// Load the native library from the given path and check that it exports `clean_title`.
    ///
    /// # Errors
    /// Returns `AccelerationUnavailable` if the library or the symbol cannot be loaded.
    #[allow(unsafe_code)]
    pub fn load(path: &Path) -> Result<Self> {
        // SAFETY: loading runs the library initializers; the library is expected to be
        // a plain C shared object that only exports `clean_title`.
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::AccelerationUnavailable(format!("{}: {e}", path.display())))?;

        // SAFETY: the symbol is declared with the C signature of `clean_title`.
        // The copied function pointer is stored together with the library that owns it.
        let function = *unsafe { library.get::<CleanTitleFn>(SYMBOL_NAME) }
            .map_err(|e| Error::AccelerationUnavailable(format!("{}: {e}", path.display())))?;

        Ok(Self {
            function,
            _library: library,
        })
    }
}

impl TitleCleaner for NativeCleaner {
    #[allow(unsafe_code)]
    fn clean_title(&self, input: &[u8], output: &mut [u8; CLEAN_BUFFER_SIZE]) {
        // Interior NUL cannot be passed to C, truncate at the first one.
        let length = input.iter().position(|&byte| byte == 0).unwrap_or(input.len());
        let Ok(input) = CString::new(&input[..length]) else {
            output[0] = 0;
            return;
        };

        // SAFETY: `input` is NUL-terminated, `output` has the fixed capacity the routine expects
        // and the library owning `function` lives as long as `self`.
        unsafe { (self.function)(input.as_ptr(), output.as_mut_ptr().cast::<c_char>()) };
    }
}

/// Default location of the native library: the platform library name in the working directory.
#[must_use]
pub fn default_library_path() -> PathBuf {
    let file_name = libloading::library_filename(LIBRARY_NAME);
    std::env::current_dir().map_or_else(|_| PathBuf::from(&file_name), |dir| dir.join(&file_name))
}

/// Pick the normalization strategy.
///
/// Tries to load the native cleaner from `library_path` (or the default location)
/// and falls back to the default strategy if that fails.
/// The load error is returned alongside so the caller can report it.
#[must_use]
pub fn select_normalizer(library_path: Option<&Path>) -> (Arc<dyn TitleNormalizer>, Option<Error>) {
    let path = library_path.map_or_else(default_library_path, Path::to_path_buf);
    match NativeCleaner::load(&path) {
        Ok(cleaner) => (Arc::new(AcceleratedNormalizer::new(cleaner)), None),
        Err(error) => (Arc::new(DefaultNormalizer), Some(error)),
    }
}
