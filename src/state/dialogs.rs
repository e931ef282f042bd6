//! Dialog list - every live dialog, newest first.

use crate::element::ElementId;
use crate::toolkit::Toolkit;

#[derive(Debug, Default)]
pub struct DialogList {
    dialogs: Vec<ElementId>,
}

impl DialogList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: ElementId) {
        if !self.dialogs.contains(&id) {
            self.dialogs.insert(0, id);
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.dialogs.retain(|&d| d != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.dialogs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

impl Toolkit {
    /// Live dialogs, most recently created first.
    pub fn dialogs(&self) -> Vec<ElementId> {
        self.dialogs.iter().collect()
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.len()
    }

    /// Mapped dialogs whose `VISIBLE` is set.
    pub fn visible_dialog_count(&self) -> usize {
        self.dialogs
            .iter()
            .filter(|&d| self.element(d).is_some_and(|el| el.is_mapped()) && self.get_bool(d, "VISIBLE"))
            .count()
    }

    /// Map `id` if needed, lay it out and make it visible.
    pub fn show(&mut self, id: ElementId) -> crate::Result<()> {
        self.map(id)?;
        self.refresh(id);
        self.set_attribute(id, "VISIBLE", Some("YES"));
        Ok(())
    }

    pub fn hide(&mut self, id: ElementId) {
        self.set_attribute(id, "VISIBLE", Some("NO"));
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::HeadlessDriver;
    use crate::toolkit::Toolkit;

    #[test]
    fn test_dialog_list_tracks_lifetime() {
        let mut tk = Toolkit::new(HeadlessDriver::default());
        let first = tk.create("dialog").expect("dialog");
        let second = tk.create("dialog").expect("dialog");
        tk.create("vbox").expect("vbox");

        assert_eq!(tk.dialogs(), [second, first]);
        tk.destroy(second);
        assert_eq!(tk.dialogs(), [first]);
    }

    #[test]
    fn test_visible_count() {
        let mut tk = Toolkit::new(HeadlessDriver::default());
        let a = tk.create("dialog").expect("dialog");
        let b = tk.create("dialog").expect("dialog");
        assert_eq!(tk.visible_dialog_count(), 0);

        tk.show(a).expect("show");
        tk.map(b).expect("map");
        assert_eq!(tk.visible_dialog_count(), 1);

        tk.show(b).expect("show");
        assert_eq!(tk.visible_dialog_count(), 2);

        tk.hide(a);
        assert_eq!(tk.visible_dialog_count(), 1);
        assert_eq!(tk.dialog_count(), 2);
    }
}
