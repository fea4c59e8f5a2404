use std::path::{Component, Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole document as UTF-8.
pub fn read_document<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/hamlet.txt"` → `"hamlet"`
/// - `"hamlet.txt"` → `"hamlet"`
pub fn document_name<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Resolves a document name to `dir/name.extension`.
///
/// The name must be a single plain path component: separators, `.`, `..`
/// and roots are rejected so the result always stays inside `dir`.
///
/// # Errors
/// Returns `io::ErrorKind::InvalidInput` for any other name.
pub fn document_path<P: AsRef<Path>>(dir: P, name: &str, extension: &str) -> io::Result<PathBuf> {
	let mut components = Path::new(name).components();
	match (components.next(), components.next()) {
		(Some(Component::Normal(part)), None) if part == name && !name.contains('\\') => {
			Ok(dir.as_ref().join(format!("{name}.{extension}")))
		}
		_ => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("invalid document name: {name:?}"))),
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_documents<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
