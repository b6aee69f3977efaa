use std::path::PathBuf;

use cdsmap::{position, AnnotationIndex, GeneStructure, MapError, Mapper, Strand};

fn mapper() -> Mapper {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/refFlat.txt");
    Mapper::from_path(path).unwrap()
}

fn pair(mapper: &Mapper, coordinate: u64, id: &str) -> Option<(u64, u64)> {
    mapper.map(coordinate, id).map(Into::into)
}

#[test]
fn test_map_normal_case() {
    let mapper = mapper();
    assert_eq!(pair(&mapper, 101153495, "NM_146145"), Some((3462, 1154)));
}

#[test]
fn test_map_coordinate_in_intron() {
    let mapper = mapper();
    assert_eq!(pair(&mapper, 101153494, "NM_146145"), None);
    assert!(matches!(
        mapper.try_map(101153494, "NM_146145"),
        Err(MapError::CoordinateNotInCds {
            coordinate: 101153494,
            ..
        })
    ));
}

#[test]
fn test_map_transcript_not_in_file() {
    let mapper = mapper();
    assert_eq!(pair(&mapper, 101153495, "NM_899287"), None);
    assert_eq!(
        mapper.try_map(101153495, "NM_899287"),
        Err(MapError::UnknownTranscript("NM_899287".to_string()))
    );
}

#[test]
fn test_map_filtered_transcripts_are_unknown() {
    let mapper = mapper();
    assert_eq!(
        mapper.try_map(15, "XM_000005"),
        Err(MapError::UnknownTranscript("XM_000005".to_string()))
    );
}

#[test]
fn test_map_cds_boundaries_forward() {
    let mapper = mapper();
    assert_eq!(pair(&mapper, 101100101, "NM_146145"), Some((1, 1)));
    assert_eq!(pair(&mapper, 101153798, "NM_146145"), Some((3765, 1255)));

    // 5' UTR base of the first coding exon and first base past the CDS
    assert_eq!(pair(&mapper, 101100100, "NM_146145"), None);
    assert_eq!(pair(&mapper, 101153799, "NM_146145"), None);
    // exon dropped entirely as UTR
    assert_eq!(pair(&mapper, 101160500, "NM_146145"), None);
}

#[test]
fn test_map_reverse_strand() {
    let mapper = mapper();
    assert_eq!(pair(&mapper, 2042, "NM_000002"), Some((1, 1)));
    assert_eq!(pair(&mapper, 2001, "NM_000002"), Some((42, 14)));
    assert_eq!(pair(&mapper, 1100, "NM_000002"), Some((43, 15)));
    assert_eq!(pair(&mapper, 1011, "NM_000002"), Some((132, 44)));

    assert_eq!(pair(&mapper, 2043, "NM_000002"), None);
    assert_eq!(pair(&mapper, 1010, "NM_000002"), None);
    assert_eq!(pair(&mapper, 1500, "NM_000002"), None);
}

#[test]
fn test_map_malformed_annotations() {
    let mapper = mapper();

    // seven coding bases
    assert_eq!(pair(&mapper, 501, "NM_000003"), None);
    assert!(matches!(
        mapper.try_map(501, "NM_000003"),
        Err(MapError::MalformedAnnotation { .. })
    ));

    // unknown strand
    assert_eq!(pair(&mapper, 1, "NM_000006"), None);
    assert!(matches!(
        mapper.try_map(1, "NM_000006"),
        Err(MapError::MalformedAnnotation { .. })
    ));
}

#[test]
fn test_map_oversized_cds_is_absent() {
    let data = "GeneH NM_000900 chr1 + 0 3000000000000000000 0 3000000000000000000 1 0, 3000000000000000000,\n";
    let mapper = Mapper::new(AnnotationIndex::from_bytes(data.as_bytes()));

    assert_eq!(pair(&mapper, 5, "NM_000900"), None);
    assert!(matches!(
        mapper.try_map(5, "NM_000900"),
        Err(MapError::MalformedAnnotation { .. })
    ));
}

#[test]
fn test_map_forward_monotonic() {
    let mapper = mapper();
    let record = mapper.index().get("NM_146145").unwrap();
    let structure = GeneStructure::build(record).unwrap();
    assert_eq!(structure.strand(), Strand::Forward);

    let n = structure.len() as u64;
    let mut previous: Option<(u64, u64)> = None;
    for (idx, &coordinate) in structure.coding_positions().iter().enumerate() {
        let (cds, aa): (u64, u64) = position::find(&structure, coordinate).unwrap().into();
        assert!((1..=n).contains(&cds));
        assert_eq!(cds, idx as u64 + 1);
        assert_eq!(aa, cds.div_ceil(3));

        if let Some((prev_cds, prev_aa)) = previous {
            assert_eq!(cds, prev_cds + 1);
            assert!(aa >= prev_aa);
            assert_eq!(aa - prev_aa, u64::from(idx % 3 == 0));
        }
        previous = Some((cds, aa));
    }
}

#[test]
fn test_map_reverse_monotonic() {
    let mapper = mapper();
    let record = mapper.index().get("NM_000002").unwrap();
    let structure = GeneStructure::build(record).unwrap();
    assert_eq!(structure.strand(), Strand::Reverse);

    let n = structure.len() as u64;
    let mut previous_cds: Option<u64> = None;
    for &coordinate in structure.coding_positions() {
        let hit = position::find(&structure, coordinate).unwrap();
        assert!((1..=n).contains(&hit.cds()));
        assert_eq!(hit.aa(), hit.cds().div_ceil(3));

        if let Some(prev) = previous_cds {
            assert_eq!(hit.cds() + 1, prev);
        }
        previous_cds = Some(hit.cds());
    }
}

#[test]
fn test_map_is_idempotent() {
    let mapper = mapper();
    let first = mapper.try_map(101153495, "NM_146145");
    for _ in 0..5 {
        assert_eq!(mapper.try_map(101153495, "NM_146145"), first);
    }
}

#[test]
fn test_map_synthetic_six_base_transcript() {
    let forward = "GeneS\tNM_000100\tchr1\t+\t99\t105\t99\t105\t1\t99,\t105,\n";
    let mapper = Mapper::new(AnnotationIndex::from_bytes(forward.as_bytes()));
    assert_eq!(pair(&mapper, 100, "NM_000100"), Some((1, 1)));
    assert_eq!(pair(&mapper, 103, "NM_000100"), Some((4, 2)));
    assert_eq!(pair(&mapper, 105, "NM_000100"), Some((6, 2)));

    let reverse = forward.replace("\t+\t", "\t-\t");
    let mapper = Mapper::new(AnnotationIndex::from_bytes(reverse.as_bytes()));
    assert_eq!(pair(&mapper, 100, "NM_000100"), Some((6, 2)));
    assert_eq!(pair(&mapper, 105, "NM_000100"), Some((1, 1)));
}

#[test]
fn test_map_all_preserves_order() {
    let mapper = mapper();
    let queries = [
        (101153495, "NM_146145"),
        (101153494, "NM_146145"),
        (2042, "NM_000002"),
        (101153495, "NM_899287"),
    ];

    let answers: Vec<Option<(u64, u64)>> = mapper
        .map_all(&queries)
        .into_iter()
        .map(|answer| answer.map(Into::into))
        .collect();
    assert_eq!(answers, vec![Some((3462, 1154)), None, Some((1, 1)), None]);

    let owned: Vec<(u64, String)> = vec![(1011, "NM_000002".to_string())];
    assert_eq!(mapper.map_all(&owned)[0].map(|p| p.cds()), Some(132));
}

#[test]
fn test_map_shared_across_threads() {
    let mapper = mapper();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pair(&mapper, 101153495, "NM_146145")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some((3462, 1154)));
        }
    });
}
