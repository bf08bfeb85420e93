use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeRef, TopicTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for NodeRef<'_> {
    #[instrument(level = "trace")]
    fn to_tree_string(&self) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self.children().map(|c| c.to_tree_string()).collect();

        Tree::new(self.topic().to_string()).with_leaves(leaves)
    }
}

impl TreeNodeConvert for TopicTree {
    fn to_tree_string(&self) -> Tree<String> {
        self.root_ref().to_tree_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Topic;

    #[test]
    fn given_tree_when_rendered_then_shows_name_and_id_per_line() {
        let mut tree = TopicTree::new(Topic::new("1", "hackmap", None));
        tree.add_node("1", Topic::new("1.1", "Web Dev", None)).unwrap();

        let rendered = tree.to_tree_string().to_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "hackmap (1)");
        assert!(lines[1].ends_with("Web Dev (1.1)"));
    }
}
