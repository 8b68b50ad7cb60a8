// Tue Jan 13 2026 - Alex

/// Storage for the value a task produced.
#[derive(Debug, Clone)]
pub struct ResultHolder<R> {
    value: Option<R>,
}

impl<R> ResultHolder<R> {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn set(&mut self, value: R) {
        self.value = Some(value);
    }

    pub fn get(&self) -> Option<&R> {
        self.value.as_ref()
    }

    pub fn take(&mut self) -> Option<R> {
        self.value.take()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl<R> Default for ResultHolder<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_keeps_last_value() {
        let mut holder = ResultHolder::new();
        assert!(!holder.is_set());

        holder.set("first");
        holder.set("second");

        assert_eq!(holder.get(), Some(&"second"));
        assert_eq!(holder.take(), Some("second"));
        assert!(holder.get().is_none());
    }

    #[test]
    fn test_holder_clear() {
        let mut holder = ResultHolder::default();
        holder.set(7u8);
        holder.clear();
        assert!(!holder.is_set());
    }
}
