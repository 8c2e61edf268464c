use std::fmt;

use super::Node;

impl fmt::Display for Node {
    /// Renders the tree as an ASCII outline, values before children:
    ///
    /// ```text
    /// source_file ()
    /// └── heading_1 ()    [0,0] - [0,1]
    ///     └── text (Title)    [0,2] - [0,6]
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.token)?;
        write_branches(f, self, "")
    }
}

fn write_branches(f: &mut fmt::Formatter<'_>, node: &Node, prefix: &str) -> fmt::Result {
    let branches: Vec<&Node> = node.values.iter().chain(&node.children).collect();
    let last = branches.len().saturating_sub(1);

    for (i, branch) in branches.into_iter().enumerate() {
        let (elbow, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(f, "{prefix}{elbow}{}", branch.token)?;
        write_branches(f, branch, &format!("{prefix}{indent}"))?;
    }

    Ok(())
}
