/// Tag file layout constants. These form the fixed per-package path
/// `<plugins_root>/CharGen/Tags/<package>/{tags,parts}.json`.

pub const CHARGEN_DIR: &str = "CharGen";
pub const TAGS_DIR: &str = "Tags";

pub const TAG_FILE_NAME: &str = "tags.json";
pub const PART_FILE_NAME: &str = "parts.json";

/// Default plugin root, relative to the game data directory
pub const DEFAULT_PLUGINS_ROOT: &str = "SKSE/Plugins";

/// Version reported by `TagRegistry::version`
pub const INTERFACE_VERSION: u32 = 1;

// Identifier syntax accepted by the form table: "<plugin>|<local id>"
pub const IDENTIFIER_SEPARATOR: char = '|';

/// Environment variable overriding `loader.plugins_root`
pub const PLUGINS_ROOT_ENV: &str = "CHARGEN_TAGS_PLUGINS_ROOT";
