///
/// SelectionItem
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectionItem {
    Field(String),
    Link(String, Selection),
}

impl SelectionItem {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Field(name) | Self::Link(name, _) => name,
        }
    }
}

///
/// Selection
/// Ordered field/link names requested on one entity.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    items: Vec<SelectionItem>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.items.push(SelectionItem::Field(name.to_string()));
        self
    }

    #[must_use]
    pub fn fields(self, names: &[&str]) -> Self {
        names.iter().fold(self, |s, name| s.field(name))
    }

    #[must_use]
    pub fn link(mut self, name: &str, selection: Self) -> Self {
        self.items.push(SelectionItem::Link(name.to_string(), selection));
        self
    }

    #[must_use]
    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nesting depth of this selection; a flat field list is depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self
            .items
            .iter()
            .map(|item| match item {
                SelectionItem::Field(_) => 0,
                SelectionItem::Link(_, sub) => sub.depth(),
            })
            .max()
            .unwrap_or_default()
    }
}

///
/// Request
/// One selection per root link, executed independently.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Request {
    roots: Vec<(String, Selection)>,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(mut self, name: &str, selection: Selection) -> Self {
        self.roots.push((name.to_string(), selection));
        self
    }

    pub fn roots(&self) -> impl Iterator<Item = (&str, &Selection)> {
        self.roots.iter().map(|(name, sel)| (name.as_str(), sel))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order() {
        let sel = Selection::new()
            .fields(&["title", "id"])
            .link("planets", Selection::new().field("name"));

        let names: Vec<_> = sel.items().iter().map(SelectionItem::name).collect();
        assert_eq!(names, ["title", "id", "planets"]);
    }

    #[test]
    fn depth_counts_nested_links() {
        let flat = Selection::new().field("name");
        let nested = Selection::new().link(
            "planets",
            Selection::new().link("features", Selection::new().field("title")),
        );

        assert_eq!(flat.depth(), 1);
        assert_eq!(nested.depth(), 3);
    }
}
