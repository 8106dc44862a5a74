//! Combining two engines: graph union and frame join.

use netrunner_table::{Frame, JoinHow};

use crate::{NetFrame, Result};

impl NetFrame {
    /// Union `other`'s indexes into this engine and re-project.
    ///
    /// - nodes: by identity; provenance lists are concatenated without
    ///   deduplication, attributes unioned with `other` winning per key
    /// - edges: by identity, `other`'s record wins on collision
    /// - column ledgers gain `other`'s entries that are not already present
    ///
    /// This engine's nodes keep their positions; new ones follow in `other`'s
    /// order.
    pub fn join_graph(&mut self, other: &NetFrame) {
        self.union_with(other, &other.node_columns, &other.edge_columns);
    }

    fn union_with(
        &mut self,
        other: &NetFrame,
        node_columns: &[String],
        edge_columns: &[(String, String)],
    ) {
        let before = (self.nodes.len(), self.edges.len());
        self.nodes.absorb(&other.nodes);
        self.edges.absorb(&other.edges);

        for column in node_columns {
            if !self.node_columns.contains(column) {
                self.node_columns.push(column.clone());
            }
        }
        for pair in edge_columns {
            if !self.edge_columns.contains(pair) {
                self.edge_columns.push(pair.clone());
            }
        }
        if self.ignore_value.is_none() {
            self.ignore_value = other.ignore_value.clone();
        }

        tracing::debug!(
            nodes_before = before.0,
            edges_before = before.1,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "joined graphs"
        );
        self.populate_network();
    }

    /// Join the frames on `left_on == right_on`, replace this engine's frame
    /// with the result, then [`NetFrame::join_graph`].
    ///
    /// An empty join result is not an error: the frame becomes empty while
    /// the graph union still happens.
    ///
    /// Ledgered columns that the join suffixed are renamed to match (`_x`
    /// on this side, `_y` on `other`'s), so [`NetFrame::apply_frame`] can
    /// replay against the joined frame. Node provenance keeps the names the
    /// nodes were extracted under.
    pub fn join_all(
        &mut self,
        other: &NetFrame,
        left_on: &str,
        right_on: &str,
        how: JoinHow,
    ) -> Result<()> {
        let joined = self.frame.join(&other.frame, left_on, right_on, how)?;

        let left = |c: &String| joined_name(&joined, c, "_x");
        let right = |c: &String| joined_name(&joined, c, "_y");
        self.node_columns = self.node_columns.iter().map(left).collect();
        self.edge_columns = self
            .edge_columns
            .iter()
            .map(|(s, t)| (left(s), left(t)))
            .collect();
        let other_nodes: Vec<String> = other.node_columns.iter().map(right).collect();
        let other_edges: Vec<(String, String)> = other
            .edge_columns
            .iter()
            .map(|(s, t)| (right(s), right(t)))
            .collect();

        self.frame = joined;
        self.union_with(other, &other_nodes, &other_edges);
        Ok(())
    }
}

/// The name `column` carries in a joined frame: unchanged if present,
/// otherwise its suffixed form when the join produced one.
fn joined_name(joined: &Frame, column: &str, suffix: &str) -> String {
    if joined.has_column(column) {
        return column.to_string();
    }
    let suffixed = format!("{column}{suffix}");
    if joined.has_column(&suffixed) {
        suffixed
    } else {
        column.to_string()
    }
}
