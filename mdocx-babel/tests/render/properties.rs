use mdocx_babel::render::{Placement, TableShape};
use proptest::prelude::*;

proptest! {
    #[test]
    fn table_rows_are_always_full(columns in 1usize..6, cells in 0usize..30) {
        let header: Vec<String> = (0..columns).map(|i| format!("h{i}")).collect();
        let data: Vec<String> = (0..cells).map(|i| format!("c{i}")).collect();

        let shape = TableShape::from_cells(header, data);

        prop_assert_eq!(shape.columns(), columns);
        prop_assert_eq!(shape.rows(), cells.div_ceil(columns) + 1);
        prop_assert!(shape.body.iter().all(|row| row.len() == columns));
        let filled = shape.body.iter().flatten().filter(|cell| !cell.is_empty()).count();
        prop_assert_eq!(filled, cells);
    }

    #[test]
    fn image_never_exceeds_its_width_cap(
        width in 1usize..10_000,
        height in 1usize..10_000,
        ppi in 50.0f64..600.0,
        cap in 0.5f64..10.0,
    ) {
        let placement = Placement::fit(width, height, ppi, cap);
        prop_assert!(placement.width_inches <= cap + 1e-9);
        let natural = width as f64 / height as f64;
        let placed = placement.width_inches / placement.height_inches;
        prop_assert!((natural - placed).abs() / natural < 1e-9);
    }
}
