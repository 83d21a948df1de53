/// Receives each parsed row and stores it in the caller's container
pub trait RowAdder<C, E> {
    fn add(&self, target: &mut C, row: Vec<E>);
}

impl<C, E, F> RowAdder<C, E> for F
where
    F: Fn(&mut C, Vec<E>),
{
    fn add(&self, target: &mut C, row: Vec<E>) {
        self(target, row)
    }
}

/// Row-major: one inner list per row
#[derive(Debug, Clone, Copy, Default)]
pub struct ListAdder;

impl<E> RowAdder<Vec<Vec<E>>, E> for ListAdder {
    fn add(&self, target: &mut Vec<Vec<E>>, row: Vec<E>) {
        target.push(row);
    }
}

/// Column-major: one inner list per column, grown as wider rows appear
///
/// Rows are expected to be full. A short row leaves its missing columns
/// shorter than the rest, so the lists no longer line up by row index; use
/// [`PaddedTransposedAdder`] when short rows are possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransposedAdder;

impl<E> RowAdder<Vec<Vec<E>>, E> for TransposedAdder {
    fn add(&self, target: &mut Vec<Vec<E>>, row: Vec<E>) {
        if target.len() < row.len() {
            target.resize_with(row.len(), Vec::new);
        }
        for (column, value) in target.iter_mut().zip(row) {
            column.push(value);
        }
    }
}

/// Column-major with `None` for fields a row did not have
///
/// Every column list keeps one entry per row added so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddedTransposedAdder;

impl<E> RowAdder<Vec<Vec<Option<E>>>, E> for PaddedTransposedAdder {
    fn add(&self, target: &mut Vec<Vec<Option<E>>>, row: Vec<E>) {
        let rows = target.first().map_or(0, Vec::len);
        while target.len() < row.len() {
            target.push(std::iter::repeat_with(|| None).take(rows).collect());
        }

        let mut values = row.into_iter();
        for column in target.iter_mut() {
            column.push(values.next());
        }
    }
}
