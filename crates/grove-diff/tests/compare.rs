//! End-to-end comparisons through the public API

use anyhow::{anyhow, Result};
use grove_core::{
    Error, Location, NodeKind, RelationshipKind, SourceFile, SourceFileSet, SourceTokenizer,
    Tree, TreeBuilder, TreeParser,
};
use grove_diff::{CorrespondenceKind, StructuralComparator, TokenBagBuilder};

struct WordTokenizer;

impl SourceTokenizer for WordTokenizer {
    fn tokenize(&self, source: &str) -> Vec<String> {
        source
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Parses a tiny outline notation, one entity per line:
/// `<kind> <name>[: body]`, nested by two-space indentation. A `uses`
/// relationship is derived for every body mentioning another entity's name.
struct OutlineParser;

impl TreeParser for OutlineParser {
    fn parse(&self, files: &SourceFileSet) -> Result<Tree> {
        let mut builder = TreeBuilder::new();
        let mut names = Vec::new();
        let mut bodies = Vec::new();
        for file in files.files() {
            let mut stack = Vec::new();
            let mut offset = 0;
            for line in file.content().split('\n') {
                let begin = offset;
                offset += line.len() + 1;
                if line.trim().is_empty() {
                    continue;
                }
                let indent = line.len() - line.trim_start().len();
                let depth = indent / 2;
                let text = line.trim_start();
                let head = text.split(':').next().unwrap_or(text);
                let mut words = head.split_whitespace();
                let kind = match words.next() {
                    Some("class") => NodeKind::Class,
                    Some("method") => NodeKind::Method,
                    Some("function") => NodeKind::Function,
                    Some("field") => NodeKind::Field,
                    other => return Err(anyhow!("unknown entity kind: {:?}", other)),
                };
                let name = words.next().unwrap_or("").to_string();
                let location = Location::new(file.path(), begin + indent, begin + line.len());
                stack.truncate(depth);
                let id = match stack.last() {
                    Some(parent) => builder.add_child(*parent, kind, name.clone(), location),
                    None => builder.add_root(kind, name.clone(), location),
                };
                stack.push(id);
                names.push((name, id));
                bodies.push((id, WordTokenizer.tokenize(text)));
            }
        }
        for (id, tokens) in &bodies {
            for (name, target) in &names {
                if target != id && !name.is_empty() && tokens.contains(name) {
                    builder.add_relationship(RelationshipKind::Use, *id, *target);
                }
            }
        }
        Ok(builder.build())
    }
}

fn file_set(path: &str, content: &str) -> SourceFileSet {
    SourceFileSet::new(vec![SourceFile::new(path, content)])
}

#[test]
fn test_rename_with_additions_and_removals() {
    let before = file_set(
        "src/account.x",
        "class Account\n\
         \x20 method deposit: amount = amount + value log(amount)\n\
         \x20 method log: print(amount)\n\
         \x20 method legacy: old cleanup routine\n",
    );
    let after = file_set(
        "src/account.x",
        "class Account\n\
         \x20 method record: amount = amount + value log(amount)\n\
         \x20 method log: print(amount)\n\
         \x20 method fresh: brand new reporting pipeline\n",
    );

    let comparator = StructuralComparator::new(OutlineParser, WordTokenizer, TokenBagBuilder);
    let diff = comparator.compare(&before, &after).unwrap();

    let same: Vec<_> = diff.of_kind(CorrespondenceKind::Same).collect();
    assert_eq!(same.len(), 2);
    assert_eq!(diff.before().node(same[0].before).name, "Account");
    assert_eq!(diff.before().node(same[1].before).name, "log");

    let renames: Vec<_> = diff.of_kind(CorrespondenceKind::Rename).collect();
    assert_eq!(renames.len(), 1);
    assert_eq!(diff.before().node(renames[0].before).name, "deposit");
    assert_eq!(diff.after().node(renames[0].after).name, "record");

    let removed: Vec<_> = diff
        .removed()
        .iter()
        .map(|id| diff.before().node(*id).name.as_str())
        .collect();
    assert_eq!(removed, vec!["legacy"]);
    let added: Vec<_> = diff
        .added()
        .iter()
        .map(|id| diff.after().node(*id).name.as_str())
        .collect();
    assert_eq!(added, vec!["fresh"]);
}

#[test]
fn test_extraction_detected_through_usage_graph() {
    let before = file_set(
        "src/billing.x",
        "class Billing\n\
         \x20 method total: base = price * quantity discount = base * rate \
         shipping = weight * zone final = base - discount + shipping return final\n",
    );
    let after = file_set(
        "src/billing.x",
        "class Billing\n\
         \x20 method total: final = discounted(items) return final\n\
         \x20 method discounted: base = price * quantity discount = base * rate \
         shipping = weight * zone return base - discount + shipping\n",
    );

    let comparator = StructuralComparator::new(OutlineParser, WordTokenizer, TokenBagBuilder);
    let diff = comparator.compare(&before, &after).unwrap();

    let extracts: Vec<_> = diff.of_kind(CorrespondenceKind::Extract).collect();
    assert_eq!(extracts.len(), 1);
    assert_eq!(diff.before().node(extracts[0].before).name, "total");
    assert_eq!(diff.after().node(extracts[0].after).name, "discounted");
    assert!(diff.added().is_empty());

    // the caller itself stays matched through Phase 1
    let total_before = extracts[0].before;
    assert!(diff.matched_after(total_before).is_some());
}

#[test]
fn test_parser_failure_aborts_comparison() {
    let before = file_set("src/app.x", "gizmo Widget\n");
    let after = file_set("src/app.x", "class Widget\n");

    let comparator = StructuralComparator::new(OutlineParser, WordTokenizer, TokenBagBuilder);
    match comparator.compare(&before, &after) {
        Err(Error::Parse(_)) => {}
        other => panic!("expected parse failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unresolvable_location_aborts_comparison() {
    let mut tb = TreeBuilder::new();
    tb.add_root(NodeKind::Class, "Ghost", Location::new("src/ghost.x", 0, 5));
    let before = tb.build();
    let after = TreeBuilder::new().build();

    let comparator = StructuralComparator::new(OutlineParser, WordTokenizer, TokenBagBuilder);
    let result = comparator.compare_trees(
        before,
        after,
        &SourceFileSet::default(),
        &SourceFileSet::default(),
    );
    match result {
        Err(Error::MissingSourceFile { path }) => {
            assert_eq!(path, std::path::PathBuf::from("src/ghost.x"));
        }
        other => panic!("expected missing source file, got {:?}", other.map(|_| ())),
    }
}
