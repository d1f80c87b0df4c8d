//! End-to-end tests: records and config in, partitions and summaries out

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::records::{read_records_from_path, write_records_to_path};
    use crate::{
        Algorithm, BoundingBox, Config, Error, Instance, InstanceGenerator, InstanceGrid, PartitionError,
        Partitioner, RecordError,
    };

    const FOUR_INSTANCES: &str = "\
# name x y bitsize
a 1 1 5
b 2 2 5

c 50 50 5
d 51 51 5
";

    fn four_instance_grid() -> InstanceGrid {
        InstanceGrid::from_reader(10.0, Cursor::new(FOUR_INSTANCES)).unwrap()
    }

    // ============================================================================
    // SCENARIOS
    // ============================================================================

    #[test]
    fn test_everything_fits_in_one_partition() {
        let grid = four_instance_grid();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cell_count(), 2);

        let mut partitioner = Partitioner::new(&grid, 100);
        let parts = partitioner.partition().unwrap();
        assert_eq!(parts.len(), 1, "Total weight 20 fits under 100");
        assert_eq!(parts[0].total_bitsize(), 20);

        let summary = partitioner.summary().unwrap();
        assert_eq!(summary.missed, 0);
        assert_eq!(summary.violating, 0);
        assert_eq!(summary.average_bitsize, 20.0);
    }

    #[test]
    fn test_two_spatial_partitions() {
        let grid = four_instance_grid();
        let mut partitioner = Partitioner::new(&grid, 15);
        for algorithm in [Algorithm::Localized, Algorithm::Merging] {
            let parts = partitioner.run(algorithm).unwrap();
            assert_eq!(parts.len(), 2, "{algorithm}");
            for part in parts {
                let names: Vec<&str> = part.instances().map(Instance::name).collect();
                assert!(
                    names == ["a", "b"] || names == ["c", "d"],
                    "{algorithm} split a pair: {names:?}"
                );
            }
            let summary = partitioner.summary().unwrap();
            assert_eq!(summary.average_bitsize, 10.0, "{algorithm}");
            assert_eq!(summary.total_routing_length, 8.0, "{algorithm}");
        }
    }

    #[test]
    fn test_oversized_instance() {
        let grid = InstanceGrid::from_reader(10.0, Cursor::new("big 0 0 5\n")).unwrap();
        let mut partitioner = Partitioner::new(&grid, 4);

        for algorithm in [Algorithm::Hashmap, Algorithm::Nearby] {
            let _ = partitioner.run(algorithm).unwrap();
            let summary = partitioner.summary().unwrap();
            assert_eq!(summary.partitions, 1, "{algorithm}");
            assert_eq!(summary.violating, 1, "{algorithm} must flag the oversized instance");
            assert_eq!(summary.missed, 0, "{algorithm}");
        }
        for algorithm in [Algorithm::Localized, Algorithm::Merging] {
            assert_eq!(
                partitioner.run(algorithm).err(),
                Some(PartitionError::InfeasibleCapacity { limit: 4, max_bitsize: 5 }),
                "{algorithm}"
            );
        }
    }

    // ============================================================================
    // FILE AND CONFIG PIPELINE
    // ============================================================================

    #[test]
    fn test_generate_write_read_partition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.txt");

        let area = BoundingBox::from_coords(0.0, 0.0, 300.0, 300.0);
        let generated = InstanceGenerator::new(2024).gaussian_clusters(700, 5, 12.0, &area).unwrap();
        write_records_to_path(&path, &generated).unwrap();

        let read_back = read_records_from_path(&path).unwrap();
        assert_eq!(read_back.len(), generated.len());
        assert!(
            read_back.iter().zip(&generated).all(|(a, b)| a.name() == b.name() && a.bitsize() == b.bitsize()),
            "Names and bitsizes survive the text format"
        );

        let grid = InstanceGrid::from_path(8.0, &path).unwrap();
        let mut partitioner = Partitioner::new(&grid, 60);
        let _ = partitioner.partition_merging().unwrap();
        let summary = partitioner.summary().unwrap();
        assert_eq!(summary.instances, 700);
        assert_eq!(summary.missed, 0);
        assert_eq!(summary.duplicates, 0);
        assert_eq!(summary.violating, 0);
    }

    #[test]
    fn test_config_driven_run() {
        let config = Config::from_toml_str(
            r#"
            [grid]
            bin_size = 10.0

            [partition]
            bitsize_limit = 15
            algorithm = "merging"
            max_balance_iterations = 50
            "#,
        )
        .unwrap();

        let grid = InstanceGrid::from_reader(config.grid.bin_size, Cursor::new(FOUR_INSTANCES)).unwrap();
        let mut partitioner = Partitioner::new(&grid, config.partition.bitsize_limit);
        if let Some(max) = config.partition.max_balance_iterations {
            partitioner = partitioner.with_max_balance_iterations(max);
        }
        let parts = partitioner.run(config.partition.algorithm).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_summary_serializes() {
        let grid = four_instance_grid();
        let mut partitioner = Partitioner::new(&grid, 15);
        let _ = partitioner.partition_merging().unwrap();
        let json = serde_json::to_value(partitioner.summary().unwrap()).unwrap();

        assert_eq!(json["algorithm"], "merging");
        assert_eq!(json["partitions"], 2);
        assert_eq!(json["balance"]["outcome"]["status"], "balanced");

        let _ = partitioner.partition_hashmap().unwrap();
        let json = serde_json::to_value(partitioner.summary().unwrap()).unwrap();
        assert!(json.get("balance").is_none(), "Only merging reports balancing");
    }

    #[test]
    fn test_bad_inputs_surface_as_errors() {
        let err = InstanceGrid::from_reader(10.0, Cursor::new("a 1 1 5\nb 2 oops 5\n")).unwrap_err();
        assert!(
            matches!(err, Error::Record(RecordError::Malformed { line: 2, .. })),
            "unexpected error: {err}"
        );

        let err = InstanceGrid::from_reader(-1.0, Cursor::new(FOUR_INSTANCES)).unwrap_err();
        assert!(matches!(err, Error::Grid(_)), "unexpected error: {err}");

        let missing = tempfile::tempdir().unwrap().path().join("missing.txt");
        let err = InstanceGrid::from_path(10.0, missing).unwrap_err();
        assert!(matches!(err, Error::Record(RecordError::Io(_))), "unexpected error: {err}");
    }
}
