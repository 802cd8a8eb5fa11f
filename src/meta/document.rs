//! Line-preserving editor for Unity `.meta` YAML
//!
//! Unity writes `.meta` files in a narrow block-style YAML subset: two-space
//! indentation, one `key: value` per line, sequences written as `- ` at the
//! parent key's indentation. Edits replace only the value text of the lines
//! they touch; every other byte is written back as read.

/// A mapping region of the document: lines `start..end` whose keys sit at
/// column `indent`. For a sequence item, `start` is the `- ` line.
///
/// Line indices are invalidated by any insertion before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub indent: usize,
}

#[derive(Debug, Clone, Copy)]
struct LineShape {
    indent: usize,
    dash: bool,
    /// Column of the first key character
    key_col: usize,
    blank: bool,
}

fn shape(line: &str) -> LineShape {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let rest = &line[indent..];
    let blank = rest.trim().is_empty() || rest.starts_with('#');
    let dash = rest == "-" || rest.starts_with("- ");
    let key_col = if dash {
        indent + 2 + (rest[1..].len() - rest[1..].trim_start_matches(' ').len()).saturating_sub(1)
    } else {
        indent
    };
    LineShape { indent, dash, key_col, blank }
}

/// Split `key: value` at `col`, returning the key and the byte offset of the
/// colon.
fn key_at(line: &str, col: usize) -> Option<(&str, usize)> {
    let rest = line.get(col..)?;
    let colon = rest.find(':')?;
    let after = &rest[colon + 1..];
    if !(after.is_empty() || after.starts_with(' ')) {
        return None;
    }
    Some((&rest[..colon], col + colon))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDocument {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl MetaDocument {
    pub fn parse(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix(line_ending).unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split(line_ending).map(str::to_string).collect()
        };

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    /// The block under a top-level key such as `TextureImporter:`
    pub fn root_block(&self, key: &str) -> Option<Block> {
        let header = self.lines.iter().position(|line| {
            let s = shape(line);
            !s.blank && s.indent == 0 && !s.dash && key_at(line, 0).is_some_and(|(k, _)| k == key)
        })?;
        Some(self.region_under(header))
    }

    /// The block under `key` inside `parent`
    pub fn child_block(&self, parent: &Block, key: &str) -> Option<Block> {
        let header = self.find_key(parent, key)?;
        Some(self.region_under(header))
    }

    /// Items of a sequence block
    pub fn items(&self, seq: &Block) -> Vec<Block> {
        let mut starts = Vec::new();
        let mut dash_indent = None;
        for i in seq.start..seq.end {
            let s = shape(&self.lines[i]);
            if s.blank || !s.dash {
                continue;
            }
            match dash_indent {
                None => {
                    dash_indent = Some(s.indent);
                    starts.push((i, s.key_col));
                }
                Some(d) if d == s.indent => starts.push((i, s.key_col)),
                _ => {}
            }
        }

        starts
            .iter()
            .enumerate()
            .map(|(n, &(start, indent))| Block {
                start,
                end: starts.get(n + 1).map_or(seq.end, |&(next, _)| next),
                indent,
            })
            .collect()
    }

    /// Line index of `key` directly inside `block`
    pub fn find_key(&self, block: &Block, key: &str) -> Option<usize> {
        (block.start..block.end).find(|&i| {
            let line = &self.lines[i];
            let s = shape(line);
            if s.blank || s.key_col != block.indent {
                return false;
            }
            // Only the opening line of an item carries the dash
            if s.dash && i != block.start {
                return false;
            }
            key_at(line, s.key_col).is_some_and(|(k, _)| k == key)
        })
    }

    /// Value text of `key` inside `block`
    pub fn scalar(&self, block: &Block, key: &str) -> Option<&str> {
        let index = self.find_key(block, key)?;
        self.value_of(index)
    }

    fn value_of(&self, index: usize) -> Option<&str> {
        let line = &self.lines[index];
        let (_, colon) = key_at(line, shape(line).key_col)?;
        Some(line[colon + 1..].trim())
    }

    /// Replace the value on a `key: value` line; returns false if the line
    /// is not a key line.
    pub fn set_scalar(&mut self, index: usize, value: &str) -> bool {
        let Some(line) = self.lines.get(index) else {
            return false;
        };
        let Some((_, colon)) = key_at(line, shape(line).key_col) else {
            return false;
        };
        let updated = format!("{}: {}", &line[..colon], value);
        self.lines[index] = updated;
        true
    }

    /// Set `key` inside `block`, appending it if absent. Returns whether the
    /// document changed; an insertion invalidates previously resolved blocks.
    pub fn upsert_scalar(&mut self, block: &Block, key: &str, value: &str) -> bool {
        if let Some(index) = self.find_key(block, key) {
            if self.value_of(index) == Some(value) {
                return false;
            }
            return self.set_scalar(index, value);
        }

        let at = self.content_end(block);
        self.lines
            .insert(at, format!("{}{}: {}", " ".repeat(block.indent), key, value));
        true
    }

    /// Append a copy of `item` after the last item of `seq`, returning the
    /// new item.
    pub fn clone_item(&mut self, seq: &Block, item: &Block) -> Block {
        let copy: Vec<String> = self.lines[item.start..self.content_end(item)].to_vec();
        let at = self.content_end(seq);
        let len = copy.len();
        self.lines.splice(at..at, copy);
        Block {
            start: at,
            end: at + len,
            indent: item.indent,
        }
    }

    /// Append a new item built from `fields` to `seq`, whose items open with
    /// `- ` at column `dash_indent`.
    pub fn push_item(
        &mut self,
        seq: &Block,
        dash_indent: usize,
        fields: &[(&str, String)],
    ) -> Block {
        let at = self.content_end(seq);
        let pad = " ".repeat(dash_indent);
        let new_lines: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(n, (key, value))| {
                if n == 0 {
                    format!("{}- {}: {}", pad, key, value)
                } else {
                    format!("{}  {}: {}", pad, key, value)
                }
            })
            .collect();
        let len = new_lines.len();
        self.lines.splice(at..at, new_lines);
        Block {
            start: at,
            end: at + len,
            indent: dash_indent + 2,
        }
    }

    /// Children of the key line at `header`
    fn region_under(&self, header: usize) -> Block {
        let header_indent = shape(&self.lines[header]).key_col;
        let mut end = header + 1;
        let mut indent = None;
        while end < self.lines.len() {
            let s = shape(&self.lines[end]);
            if !s.blank {
                let inside = s.indent > header_indent || (s.dash && s.indent == header_indent);
                if !inside {
                    break;
                }
                indent.get_or_insert(if s.dash { s.indent } else { s.key_col });
            }
            end += 1;
        }
        Block {
            start: header + 1,
            end,
            indent: indent.unwrap_or(header_indent + 2),
        }
    }

    /// One past the last non-blank line of `block`
    fn content_end(&self, block: &Block) -> usize {
        let mut end = block.end;
        while end > block.start && shape(&self.lines[end - 1]).blank {
            end -= 1;
        }
        end
    }
}

impl std::fmt::Display for MetaDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = self.lines.join(self.line_ending);
        f.write_str(&body)?;
        if self.trailing_newline {
            f.write_str(self.line_ending)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "fileFormatVersion: 2
guid: 0123456789abcdef0123456789abcdef
TextureImporter:
  internalIDToNameTable: []
  externalObjects: {}
  serializedVersion: 12
  mipmaps:
    mipMapMode: 0
    enableMipMap: 1
  spriteBorder: {x: 0, y: 0, z: 0, w: 0}
  textureType: 0
  platformSettings:
  - serializedVersion: 3
    buildTarget: DefaultTexturePlatform
    maxTextureSize: 2048
    textureFormat: -1
  - serializedVersion: 3
    buildTarget: Standalone
    maxTextureSize: 1024
    textureFormat: 10
  spriteSheet:
    serializedVersion: 2
    sprites: []
  userData:
  assetBundleName:
";

    #[test]
    fn test_unedited_round_trip() {
        assert_eq!(MetaDocument::parse(SAMPLE).to_string(), SAMPLE);

        let crlf = SAMPLE.replace('\n', "\r\n");
        assert_eq!(MetaDocument::parse(&crlf).to_string(), crlf);

        let no_newline = SAMPLE.trim_end_matches('\n');
        assert_eq!(MetaDocument::parse(no_newline).to_string(), no_newline);
    }

    #[test]
    fn test_lookup() {
        let doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        assert_eq!(importer.indent, 2);
        assert_eq!(doc.scalar(&importer, "textureType"), Some("0"));
        assert_eq!(doc.scalar(&importer, "userData"), Some(""));
        // nested keys are not visible from the parent
        assert_eq!(doc.scalar(&importer, "mipMapMode"), None);

        let mipmaps = doc.child_block(&importer, "mipmaps").unwrap();
        assert_eq!(doc.scalar(&mipmaps, "mipMapMode"), Some("0"));

        let sheet = doc.child_block(&importer, "spriteSheet").unwrap();
        assert_eq!(doc.scalar(&sheet, "serializedVersion"), Some("2"));
    }

    #[test]
    fn test_sequence_items() {
        let doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let items = doc.items(&platforms);
        assert_eq!(items.len(), 2);
        assert_eq!(doc.scalar(&items[0], "serializedVersion"), Some("3"));
        assert_eq!(doc.scalar(&items[0], "buildTarget"), Some("DefaultTexturePlatform"));
        assert_eq!(doc.scalar(&items[1], "buildTarget"), Some("Standalone"));
        assert_eq!(doc.scalar(&items[1], "textureFormat"), Some("10"));
    }

    #[test]
    fn test_set_scalar_touches_one_line() {
        let mut doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let mipmaps = doc.child_block(&importer, "mipmaps").unwrap();
        assert!(doc.upsert_scalar(&mipmaps, "mipMapMode", "1"));
        assert!(!doc.upsert_scalar(&mipmaps, "mipMapMode", "1"));

        let expected = SAMPLE.replace("    mipMapMode: 0", "    mipMapMode: 1");
        assert_eq!(doc.to_string(), expected);
    }

    #[test]
    fn test_set_scalar_on_item_dash_line() {
        let mut doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let item = doc.items(&platforms)[1];
        doc.upsert_scalar(&item, "serializedVersion", "4");
        assert!(doc.to_string().contains("  - serializedVersion: 4\n    buildTarget: Standalone"));
    }

    #[test]
    fn test_insert_missing_key() {
        let mut doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let item = doc.items(&platforms)[1];
        assert!(doc.upsert_scalar(&item, "overridden", "1"));
        assert!(doc
            .to_string()
            .contains("    textureFormat: 10\n    overridden: 1\n  spriteSheet:"));
    }

    #[test]
    fn test_clone_item() {
        let mut doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let first = doc.items(&platforms)[0];
        let copy = doc.clone_item(&platforms, &first);
        doc.upsert_scalar(&copy, "buildTarget", "Android");

        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let items = doc.items(&platforms);
        assert_eq!(items.len(), 3);
        assert_eq!(doc.scalar(&items[2], "buildTarget"), Some("Android"));
        assert_eq!(doc.scalar(&items[0], "buildTarget"), Some("DefaultTexturePlatform"));
    }

    #[test]
    fn test_push_item() {
        let mut doc = MetaDocument::parse(SAMPLE);
        let importer = doc.root_block("TextureImporter").unwrap();
        let platforms = doc.child_block(&importer, "platformSettings").unwrap();
        let item = doc.push_item(
            &platforms,
            2,
            &[("serializedVersion", "3".into()), ("buildTarget", "iPhone".into())],
        );
        assert_eq!(doc.scalar(&item, "buildTarget"), Some("iPhone"));
        assert!(doc
            .to_string()
            .contains("  - serializedVersion: 3\n    buildTarget: iPhone\n  spriteSheet:"));
    }

    #[test]
    fn test_missing_root() {
        let doc = MetaDocument::parse("fileFormatVersion: 2\nDefaultImporter:\n  userData: \n");
        assert!(doc.root_block("TextureImporter").is_none());
        assert!(doc.root_block("DefaultImporter").is_some());
    }
}
