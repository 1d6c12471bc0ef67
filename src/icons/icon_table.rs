use std::collections::HashMap;

use tracing::debug;

pub const DEFAULT_ICON_BASE_URL: &str =
    "https://raw.githubusercontent.com/vscode-icons/vscode-icons/master/icons/";

const DEFAULT_FILE_ICON: &str = "default_file.svg";
const DEFAULT_OPEN_FOLDER_ICON: &str = "default_folder_opened.svg";

// Whole file names, matched case-insensitively before any extension.
const FILE_NAME_ICONS: &[(&str, &str)] = &[
    (".dockerignore", "file_type_docker.svg"),
    (".editorconfig", "file_type_editorconfig.svg"),
    (".env", "file_type_dotenv.svg"),
    (".eslintrc", "file_type_eslint.svg"),
    (".eslintrc.js", "file_type_eslint.svg"),
    (".eslintrc.json", "file_type_eslint.svg"),
    (".gitattributes", "file_type_git.svg"),
    (".gitignore", "file_type_git.svg"),
    (".gitmodules", "file_type_git.svg"),
    (".npmrc", "file_type_npm.svg"),
    (".prettierrc", "file_type_prettier.svg"),
    ("cargo.lock", "file_type_cargo.svg"),
    ("cargo.toml", "file_type_cargo.svg"),
    ("docker-compose.yml", "file_type_docker.svg"),
    ("dockerfile", "file_type_docker.svg"),
    ("license", "file_type_license.svg"),
    ("license.md", "file_type_license.svg"),
    ("makefile", "file_type_makefile.svg"),
    ("package-lock.json", "file_type_npm.svg"),
    ("package.json", "file_type_npm.svg"),
    ("pnpm-lock.yaml", "file_type_pnpm.svg"),
    ("remix.config.js", "file_type_remix.svg"),
    ("tailwind.config.js", "file_type_tailwind.svg"),
    ("tailwind.config.ts", "file_type_tailwind.svg"),
    ("tsconfig.json", "file_type_tsconfig.svg"),
    ("vite.config.ts", "file_type_vite.svg"),
    ("yarn.lock", "file_type_yarn.svg"),
];

// Extensions without the leading dot. Compound extensions are tried first.
const EXTENSION_ICONS: &[(&str, &str)] = &[
    ("7z", "file_type_zip.svg"),
    ("bat", "file_type_bat.svg"),
    ("bmp", "file_type_image.svg"),
    ("c", "file_type_c.svg"),
    ("cjs", "file_type_js.svg"),
    ("cpp", "file_type_cpp.svg"),
    ("cs", "file_type_csharp.svg"),
    ("css", "file_type_css.svg"),
    ("csv", "file_type_excel.svg"),
    ("d.ts", "file_type_typescriptdef.svg"),
    ("dart", "file_type_dartlang.svg"),
    ("doc", "file_type_word.svg"),
    ("docx", "file_type_word.svg"),
    ("ex", "file_type_elixir.svg"),
    ("exs", "file_type_elixir.svg"),
    ("gif", "file_type_image.svg"),
    ("go", "file_type_go.svg"),
    ("graphql", "file_type_graphql.svg"),
    ("gz", "file_type_zip.svg"),
    ("h", "file_type_cheader.svg"),
    ("hpp", "file_type_cppheader.svg"),
    ("hs", "file_type_haskell.svg"),
    ("htm", "file_type_html.svg"),
    ("html", "file_type_html.svg"),
    ("ico", "file_type_favicon.svg"),
    ("java", "file_type_java.svg"),
    ("jpeg", "file_type_image.svg"),
    ("jpg", "file_type_image.svg"),
    ("js", "file_type_js.svg"),
    ("json", "file_type_json.svg"),
    ("jsx", "file_type_reactjs.svg"),
    ("kt", "file_type_kotlin.svg"),
    ("less", "file_type_less.svg"),
    ("lock", "file_type_lock.svg"),
    ("log", "file_type_log.svg"),
    ("lua", "file_type_lua.svg"),
    ("md", "file_type_markdown.svg"),
    ("mdx", "file_type_mdx.svg"),
    ("mjs", "file_type_js.svg"),
    ("mp3", "file_type_audio.svg"),
    ("mp4", "file_type_video.svg"),
    ("pdf", "file_type_pdf.svg"),
    ("php", "file_type_php.svg"),
    ("png", "file_type_image.svg"),
    ("proto", "file_type_protobuf.svg"),
    ("ps1", "file_type_powershell.svg"),
    ("py", "file_type_python.svg"),
    ("rb", "file_type_ruby.svg"),
    ("rs", "file_type_rust.svg"),
    ("sass", "file_type_sass.svg"),
    ("scala", "file_type_scala.svg"),
    ("scss", "file_type_scss.svg"),
    ("sh", "file_type_shell.svg"),
    ("spec.ts", "file_type_testts.svg"),
    ("sql", "file_type_sql.svg"),
    ("svelte", "file_type_svelte.svg"),
    ("svg", "file_type_svg.svg"),
    ("swift", "file_type_swift.svg"),
    ("tar", "file_type_zip.svg"),
    ("test.js", "file_type_testjs.svg"),
    ("test.ts", "file_type_testts.svg"),
    ("toml", "file_type_toml.svg"),
    ("ts", "file_type_typescript.svg"),
    ("tsx", "file_type_reactts.svg"),
    ("ttf", "file_type_font.svg"),
    ("txt", "file_type_text.svg"),
    ("vue", "file_type_vue.svg"),
    ("wasm", "file_type_wasm.svg"),
    ("wav", "file_type_audio.svg"),
    ("webp", "file_type_image.svg"),
    ("woff", "file_type_font.svg"),
    ("woff2", "file_type_font.svg"),
    ("xls", "file_type_excel.svg"),
    ("xlsx", "file_type_excel.svg"),
    ("xml", "file_type_xml.svg"),
    ("yaml", "file_type_yaml.svg"),
    ("yml", "file_type_yaml.svg"),
    ("zip", "file_type_zip.svg"),
];

const FOLDER_ICONS: &[(&str, &str)] = &[
    (".git", "folder_type_git_opened.svg"),
    (".github", "folder_type_github_opened.svg"),
    (".vscode", "folder_type_vscode_opened.svg"),
    ("__tests__", "folder_type_test_opened.svg"),
    ("api", "folder_type_api_opened.svg"),
    ("app", "folder_type_app_opened.svg"),
    ("assets", "folder_type_asset_opened.svg"),
    ("build", "folder_type_dist_opened.svg"),
    ("components", "folder_type_component_opened.svg"),
    ("config", "folder_type_config_opened.svg"),
    ("db", "folder_type_db_opened.svg"),
    ("dist", "folder_type_dist_opened.svg"),
    ("doc", "folder_type_docs_opened.svg"),
    ("docs", "folder_type_docs_opened.svg"),
    ("hooks", "folder_type_hook_opened.svg"),
    ("images", "folder_type_images_opened.svg"),
    ("img", "folder_type_images_opened.svg"),
    ("include", "folder_type_include_opened.svg"),
    ("lib", "folder_type_library_opened.svg"),
    ("node_modules", "folder_type_node_opened.svg"),
    ("out", "folder_type_dist_opened.svg"),
    ("public", "folder_type_public_opened.svg"),
    ("routes", "folder_type_route_opened.svg"),
    ("scripts", "folder_type_script_opened.svg"),
    ("spec", "folder_type_test_opened.svg"),
    ("src", "folder_type_src_opened.svg"),
    ("styles", "folder_type_style_opened.svg"),
    ("test", "folder_type_test_opened.svg"),
    ("tests", "folder_type_test_opened.svg"),
    ("tools", "folder_type_tools_opened.svg"),
];

/// Resolves icon file names for tree rows and turns them into image URLs.
///
/// Configured overrides are consulted before the built-in tables. All keys
/// are matched lower-cased; file keys may be a whole file name or an
/// extension, with or without the leading dot.
#[derive(Debug, Clone)]
pub struct IconTable {
    base_url: String,
    file_overrides: HashMap<String, String>,
    folder_overrides: HashMap<String, String>,
}

impl Default for IconTable {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE_URL)
    }
}

impl IconTable {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            file_overrides: HashMap::new(),
            folder_overrides: HashMap::new(),
        }
    }

    pub fn with_file_override(mut self, key: &str, icon: impl Into<String>) -> Self {
        let key = key.trim_start_matches('.').to_lowercase();
        self.file_overrides.insert(key, icon.into());
        self
    }

    pub fn with_folder_override(mut self, name: &str, icon: impl Into<String>) -> Self {
        self.folder_overrides.insert(name.to_lowercase(), icon.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn icon_for_file(&self, file_name: &str) -> &str {
        let lowered = file_name.to_lowercase();
        let bare = lowered.trim_start_matches('.');

        if let Some(icon) = self.file_overrides.get(bare) {
            return icon;
        }
        if let Some(icon) = lookup(FILE_NAME_ICONS, &lowered) {
            return icon;
        }

        // "a.test.ts" tries "test.ts" then "ts".
        for (index, _) in lowered.match_indices('.') {
            let extension = &lowered[index + 1..];
            if extension.is_empty() {
                continue;
            }
            if let Some(icon) = self.file_overrides.get(extension) {
                return icon;
            }
            if let Some(icon) = lookup(EXTENSION_ICONS, extension) {
                return icon;
            }
        }

        debug!("No icon mapping for file '{}'", file_name);
        DEFAULT_FILE_ICON
    }

    pub fn icon_for_open_folder(&self, folder_name: &str) -> &str {
        let lowered = folder_name.to_lowercase();
        self.folder_overrides
            .get(&lowered)
            .map(String::as_str)
            .or_else(|| lookup(FOLDER_ICONS, &lowered))
            .unwrap_or(DEFAULT_OPEN_FOLDER_ICON)
    }

    pub fn url(&self, icon: &str) -> String {
        format!("{}{}", self.base_url, icon)
    }

    pub fn file_url(&self, file_name: &str) -> String {
        self.url(self.icon_for_file(file_name))
    }

    pub fn open_folder_url(&self, folder_name: &str) -> String {
        self.url(self.icon_for_open_folder(folder_name))
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .binary_search_by(|(candidate, _)| (*candidate).cmp(key))
        .ok()
        .map(|index| table[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn test_tables_are_sorted_for_binary_search() {
        for table in [FILE_NAME_ICONS, EXTENSION_ICONS, FOLDER_ICONS] {
            assert!(table.windows(2).all(|pair| pair[0].0 < pair[1].0));
        }
    }

    #[rstest]
    #[case("main.rs", "file_type_rust.svg")]
    #[case("root.tsx", "file_type_reactts.svg")]
    #[case("README.md", "file_type_markdown.svg")]
    #[case("Cargo.toml", "file_type_cargo.svg")]
    #[case("config.toml", "file_type_toml.svg")]
    #[case("Dockerfile", "file_type_docker.svg")]
    #[case(".gitignore", "file_type_git.svg")]
    #[case("types.d.ts", "file_type_typescriptdef.svg")]
    #[case("tree.test.ts", "file_type_testts.svg")]
    #[case("archive.tar.gz", "file_type_zip.svg")]
    #[case("PHOTO.JPG", "file_type_image.svg")]
    #[case("unknown.xyz", "default_file.svg")]
    #[case("noextension", "default_file.svg")]
    #[case("trailingdot.", "default_file.svg")]
    fn test_icon_for_file(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(IconTable::default().icon_for_file(name), expected);
    }

    #[rstest]
    #[case("src", "folder_type_src_opened.svg")]
    #[case("Tests", "folder_type_test_opened.svg")]
    #[case(".github", "folder_type_github_opened.svg")]
    #[case("whatever", "default_folder_opened.svg")]
    fn test_icon_for_open_folder(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(IconTable::default().icon_for_open_folder(name), expected);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let table = IconTable::default()
            .with_file_override(".rs", "custom_rust.svg")
            .with_file_override("Makefile", "custom_make.svg")
            .with_folder_override("SRC", "custom_src.svg");

        assert_eq!(table.icon_for_file("lib.rs"), "custom_rust.svg");
        assert_eq!(table.icon_for_file("makefile"), "custom_make.svg");
        assert_eq!(table.icon_for_open_folder("src"), "custom_src.svg");
        assert_eq!(table.icon_for_file("index.ts"), "file_type_typescript.svg");
    }

    #[test]
    fn test_url_joins_base_and_icon() {
        let table = IconTable::new("https://icons.example.com/set");

        assert_eq!(table.base_url(), "https://icons.example.com/set/");
        assert_eq!(
            table.file_url("a.json"),
            "https://icons.example.com/set/file_type_json.svg"
        );
        assert_eq!(
            IconTable::default().open_folder_url("docs"),
            format!("{DEFAULT_ICON_BASE_URL}folder_type_docs_opened.svg")
        );
    }
}
