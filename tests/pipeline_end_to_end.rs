use bandmatch::{
    partition_rows, BandMatchError, ErrorKind, ImageView, MatchConfig, MatchLocation, Matcher,
    Method, Mode, Template,
};

fn make_template(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn embed(
    img_width: usize,
    img_height: usize,
    tpl: &[u8],
    tpl_width: usize,
    x0: usize,
    y0: usize,
) -> Vec<u8> {
    let tpl_height = tpl.len() / tpl_width;
    let mut image = vec![0u8; img_width * img_height];
    for y in 0..tpl_height {
        for x in 0..tpl_width {
            image[(y0 + y) * img_width + (x0 + x)] = tpl[y * tpl_width + x];
        }
    }
    image
}

#[test]
fn finds_exact_copy_at_30_40_in_both_modes() {
    let tpl_data = make_template(20, 20);
    let image = embed(100, 100, &tpl_data, 20, 30, 40);
    let template = Template::new(tpl_data, 20, 20).unwrap();
    let view = ImageView::from_slice(&image, 100, 100).unwrap();

    for method in [Method::Ccoeff, Method::Sqdiff, Method::CcoeffNormed] {
        for mode in [Mode::Sequential, Mode::Parallel] {
            let matcher = Matcher::new(&template).unwrap().with_config(MatchConfig {
                mode,
                method,
                workers: Some(4),
                ..MatchConfig::default()
            });
            let found = matcher.match_image(view).unwrap();
            assert_eq!(found.location, MatchLocation { x: 30, y: 40 }, "{method:?} {mode:?}");
            assert_eq!(found.bbox.top_left, MatchLocation { x: 30, y: 40 });
            assert_eq!(found.bbox.bottom_right, MatchLocation { x: 50, y: 60 });
        }
    }
}

#[test]
fn match_straddling_a_band_boundary_is_found() {
    let (img_width, img_height) = (64, 60);
    let workers = 4;
    let bands = partition_rows(img_height, workers).unwrap();
    // Place the template so it starts three rows above the second boundary.
    let y0 = bands[1].rows.end - 3;
    let tpl_data = make_template(12, 10);
    let image = embed(img_width, img_height, &tpl_data, 12, 21, y0);
    let template = Template::new(tpl_data, 12, 10).unwrap();
    let view = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let matcher = Matcher::new(&template).unwrap().with_config(MatchConfig {
        method: Method::Sqdiff,
        workers: Some(workers),
        ..MatchConfig::default()
    });
    let found = matcher.match_parallel(view).unwrap();
    assert_eq!(found.location, MatchLocation { x: 21, y: y0 });
    assert_eq!(found.score, 0.0);
}

#[test]
fn repeated_parallel_runs_are_identical() {
    let tpl_data = make_template(16, 11);
    let image = embed(90, 70, &tpl_data, 16, 47, 33);
    let template = Template::new(tpl_data, 16, 11).unwrap();
    let view = ImageView::from_slice(&image, 90, 70).unwrap();
    let matcher = Matcher::new(&template).unwrap().with_config(MatchConfig {
        workers: Some(3),
        ..MatchConfig::default()
    });

    let first = matcher.match_parallel(view).unwrap();
    for _ in 0..5 {
        assert_eq!(matcher.match_parallel(view).unwrap(), first);
    }
}

#[test]
fn bounding_box_always_fits_inside_the_image() {
    let (img_width, img_height) = (23, 17);
    let image: Vec<u8> = (0..img_width * img_height)
        .map(|i| ((i * 97) % 251) as u8)
        .collect();
    let view = ImageView::from_slice(&image, img_width, img_height).unwrap();
    for (tpl_width, tpl_height) in [(1, 1), (5, 3), (23, 1), (1, 17), (23, 17), (11, 16)] {
        let template = Template::new(make_template(tpl_width, tpl_height), tpl_width, tpl_height)
            .unwrap();
        for method in [Method::Ccoeff, Method::Ccorr, Method::Sqdiff] {
            let matcher = Matcher::new(&template).unwrap().with_config(MatchConfig {
                method,
                workers: Some(5),
                ..MatchConfig::default()
            });
            let found = matcher.match_parallel(view).unwrap();
            assert!(found.bbox.fits_within(img_width, img_height));
            assert_eq!(found.bbox.width(), tpl_width);
            assert_eq!(found.bbox.height(), tpl_height);
        }
    }
}

#[test]
fn template_equal_to_image_has_a_single_placement() {
    let data = make_template(8, 6);
    let template = Template::new(data.clone(), 8, 6).unwrap();
    let view = ImageView::from_slice(&data, 8, 6).unwrap();
    let matcher = Matcher::new(&template).unwrap().with_config(MatchConfig {
        workers: Some(4),
        ..MatchConfig::default()
    });
    let scores = matcher.score_map_parallel(view).unwrap();
    assert_eq!((scores.width(), scores.height()), (1, 1));
    assert_eq!(
        matcher.match_parallel(view).unwrap().location,
        MatchLocation { x: 0, y: 0 }
    );
}

#[test]
fn too_large_template_is_an_input_error() {
    let image = vec![0u8; 10 * 10];
    let view = ImageView::from_slice(&image, 10, 10).unwrap();
    let template = Template::new(make_template(11, 4), 11, 4).unwrap();
    let err = Matcher::new(&template)
        .unwrap()
        .match_image(view)
        .unwrap_err();
    assert!(matches!(err, BandMatchError::TemplateTooLarge { .. }));
    assert_eq!(err.kind(), ErrorKind::Input);
}
