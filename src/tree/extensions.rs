/// File type categories for color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    /// Audio and video
    Media,
    /// Documents and ebooks
    Document,
    /// Archives, packages and disk images
    Archive,
    Code,
    /// Executables, libraries and object files
    Binary,
    Config,
    /// Databases, data sets, fonts and 3D assets
    Data,
    /// Unknown / no extension
    Other,
}

/// Classify a file extension (without the dot) into a category.
pub fn categorize_extension(ext: &str) -> FileCategory {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif"
        | "raw" | "cr2" | "nef" | "heic" | "avif" => FileCategory::Image,

        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg"
        | "3gp" | "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" | "mid"
        | "midi" => FileCategory::Media,

        "pdf" | "doc" | "docx" | "txt" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx"
        | "md" | "rst" | "epub" | "mobi" | "azw3" | "djvu" => FileCategory::Document,

        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "lz4" | "cab" | "deb"
        | "rpm" | "pkg" | "msi" | "appimage" | "whl" | "crate" | "iso" | "img" | "vhd"
        | "vmdk" | "qcow2" => FileCategory::Archive,

        "rs" | "py" | "pyx" | "js" | "jsx" | "ts" | "tsx" | "c" | "cpp" | "h" | "hpp"
        | "java" | "go" | "rb" | "php" | "html" | "htm" | "css" | "scss" | "swift" | "kt"
        | "cs" | "lua" | "sh" | "bash" | "zsh" | "sql" | "r" | "dart" | "zig" | "vue" => {
            FileCategory::Code
        }

        "exe" | "dll" | "sys" | "so" | "dylib" | "elf" | "o" | "a" | "lib" | "rlib" | "pyc"
        | "pyd" | "class" | "wasm" | "bin" => FileCategory::Binary,

        "ini" | "cfg" | "toml" | "yaml" | "yml" | "json" | "xml" | "conf" | "env"
        | "properties" | "lock" => FileCategory::Config,

        "csv" | "tsv" | "parquet" | "db" | "sqlite" | "sqlite3" | "mdb" | "prof" | "pstats"
        | "jsonl" | "ttf" | "otf" | "woff" | "woff2" | "blend" | "fbx" | "obj" | "stl"
        | "gltf" | "glb" => FileCategory::Data,

        _ => FileCategory::Other,
    }
}
