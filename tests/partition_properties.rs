use bandmatch::{partition_rows, Band};

#[test]
fn bands_cover_every_row_once_in_order() {
    for height in 0..64 {
        for count in 1..12 {
            let bands = partition_rows(height, count).unwrap();
            assert_eq!(bands.len(), count);

            let mut next = 0;
            for (index, band) in bands.iter().enumerate() {
                assert_eq!(band.index, index);
                assert_eq!(band.rows.start, next, "gap or overlap at band {index}");
                next = band.rows.end;
            }
            assert_eq!(next, height);

            let lens: Vec<usize> = bands.iter().map(Band::len).collect();
            let min = *lens.iter().min().unwrap();
            let max = *lens.iter().max().unwrap();
            assert!(max - min <= 1, "uneven split {lens:?}");
            assert!(lens.windows(2).all(|w| w[0] >= w[1]), "extra rows must come first");
        }
    }
}

#[test]
fn partition_is_deterministic() {
    assert_eq!(partition_rows(101, 7).unwrap(), partition_rows(101, 7).unwrap());
}

#[test]
fn owned_placements_tile_the_placement_rows() {
    for img_height in 1..40 {
        for tpl_height in 1..=img_height {
            for count in 1..9 {
                let bands = partition_rows(img_height, count).unwrap();
                let mut next = 0;
                for band in &bands {
                    let placements = band.placement_rows(tpl_height, img_height);
                    let context = band.context_rows(tpl_height, img_height);
                    if placements.is_empty() {
                        assert!(context.is_empty());
                        continue;
                    }
                    assert_eq!(placements.start, next);
                    assert_eq!(context.start, placements.start);
                    assert_eq!(context.len(), placements.len() + tpl_height - 1);
                    assert!(context.end <= img_height);
                    next = placements.end;
                }
                assert_eq!(next, img_height - tpl_height + 1);
            }
        }
    }
}
