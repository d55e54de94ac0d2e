use colored::Colorize;
use supports_color::Stream;
use ufs::filesystem::Children;
use ufs::{EntryKind, Listing, Node, Store};

use crate::application::Outcome;

pub fn print(outcome: &Outcome, json: bool) -> Result<(), serde_json::Error> {
    if supports_color::on(Stream::Stdout).is_none() {
        colored::control::set_override(false);
    }

    match outcome {
        Outcome::Path(path) => println!("{path}"),
        Outcome::Contents(contents) => println!("{contents}"),
        Outcome::Exists(exists) => println!("{exists}"),
        Outcome::Kind(Some(EntryKind::File)) => println!("file"),
        Outcome::Kind(Some(EntryKind::Directory)) => println!("directory"),
        Outcome::Kind(None) => println!("missing"),
        Outcome::Listing(listing) if json => println!("{}", serde_json::to_string_pretty(listing)?),
        Outcome::Listing(listing) => print!("{}", render_listing(listing)),
        Outcome::Tree(store) if json => println!("{}", store.to_json_pretty()?),
        Outcome::Tree(store) => print!("{}", render_tree(store)),
        Outcome::Done => {}
    }
    Ok(())
}

fn directory_name(name: &str) -> String {
    format!("{name}/").blue().bold().to_string()
}

fn render_listing(listing: &Listing) -> String {
    listing
        .iter()
        .map(|(name, kind)| match kind {
            EntryKind::Directory => format!("{}\n", directory_name(name)),
            EntryKind::File => format!("{name}\n"),
        })
        .collect()
}

fn render_tree(store: &Store) -> String {
    let mut rendered = String::from("/\n");
    render_children(&store.files, 1, &mut rendered);
    rendered
}

fn render_children(children: &Children, depth: usize, rendered: &mut String) {
    for (name, node) in children {
        let indent = "  ".repeat(depth);
        match node {
            Node::File(contents) => {
                rendered.push_str(&format!("{indent}{name} ({} bytes)\n", contents.len()));
            }
            Node::Directory(nested) => {
                rendered.push_str(&format!("{indent}{}\n", directory_name(name)));
                render_children(nested, depth + 1, rendered);
            }
        }
    }
}
