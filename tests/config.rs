use mesh_partition::prelude::*;

#[test]
fn partition_config_from_json() {
    let cfg: PartitionConfig =
        serde_json::from_str(r#"{ "n_subdomains": 4, "partitioner": "metis" }"#).unwrap();
    assert_eq!(cfg.n_subdomains, 4);
    assert_eq!(cfg.partitioner, PartitionerKind::Metis);
    assert_eq!(cfg.ncommon, None);

    let empty: PartitionConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, PartitionConfig::default());
}

#[test]
fn block_policies_from_json() {
    let split: BlockPolicy = serde_json::from_str(r#"{ "kind": "material_split" }"#).unwrap();
    assert_eq!(split, BlockPolicy::MaterialSplit { primary: MaterialTag::FLUID });

    let groups: BlockPolicy = serde_json::from_str(
        r#"{ "kind": "material_groups",
             "groups": [ { "material": 4, "block_size": 8 },
                         { "material": 2, "block_size": 16 } ] }"#,
    )
    .unwrap();
    assert_eq!(
        groups,
        BlockPolicy::MaterialGroups {
            groups: vec![
                MaterialGroup { material: MaterialTag::SOLID, block_size: 8 },
                MaterialGroup { material: MaterialTag::FLUID, block_size: 16 },
            ]
        }
    );

    let round = serde_json::to_string(&BlockPolicy::Connectivity { block_size: 32, ncommon: None }).unwrap();
    assert_eq!(round, r#"{"kind":"connectivity","block_size":32}"#);

    let tight: BlockPolicy =
        serde_json::from_str(r#"{ "kind": "connectivity", "block_size": 8, "ncommon": 1 }"#).unwrap();
    assert_eq!(tight, BlockPolicy::Connectivity { block_size: 8, ncommon: Some(1) });
}

#[test]
fn summary_serializes() {
    let raw = mesh_partition::mesh_generation::quad_grid(2, 2, 4).unwrap();
    let level = MeshLevel::build(raw, &PartitionConfig::with_subdomains(2)).unwrap();
    let json = serde_json::to_value(level.summary()).unwrap();
    assert_eq!(json["n_elements"], 4);
    assert_eq!(json["node_classes"]["vertex"], 9);
    assert_eq!(json["dof_totals"][0], 9);
}
