use proptest::prelude::*;
use ssh_bottle::catalog::parse::{parse_disk_space, parse_exit_status};
use ssh_bottle::target::resolve_targets;
use std::collections::{HashMap, HashSet};

fn size() -> impl Strategy<Value = String> {
    (1u32..999, prop::sample::select(vec!["K", "M", "G", "T"]))
        .prop_map(|(n, u)| format!("{}{}", n, u))
}

fn df_row() -> impl Strategy<Value = (String, String, String, String)> {
    (
        prop::sample::select(vec!["/dev/root", "/dev/sda1", "tmpfs", "/dev/mmcblk0p1"]),
        size(),
        size(),
        size(),
    )
        .prop_map(|(dev, a, b, c)| (dev.to_string(), a, b, c))
}

proptest! {
    #[test]
    fn disk_space_is_idempotent_and_order_independent(
        rows in prop::collection::vec(df_row(), 0..6)
    ) {
        let render = |rows: &[(String, String, String, String)]| {
            let mut out = String::from("Filesystem      Size  Used Avail Use% Mounted on\n");
            for (dev, s, u, a) in rows {
                out.push_str(&format!("{}  {}  {}  {}  1% /mnt\n", dev, s, u, a));
            }
            out
        };
        let output = render(&rows);
        let first = parse_disk_space(&output);
        prop_assert_eq!(&first, &parse_disk_space(&output));

        // swapping rows of different devices changes nothing
        let mut others: Vec<_> = rows.iter().filter(|r| r.0 != "/dev/root").cloned().collect();
        let roots: Vec<_> = rows.iter().filter(|r| r.0 == "/dev/root").cloned().collect();
        others.extend(roots);
        let reordered = parse_disk_space(&render(&others));
        prop_assert_eq!(first.root, reordered.root);
        prop_assert_eq!(first.sda1, reordered.sda1);

        let has_root = rows.iter().any(|r| r.0 == "/dev/root");
        prop_assert_eq!(parse_disk_space(&output).root.is_some(), has_root);
    }

    #[test]
    fn exit_status_true_only_for_zero(code in 0u8..=255) {
        prop_assert_eq!(parse_exit_status(&format!("{}\n", code)), code == 0);
    }

    #[test]
    fn resolved_identities_are_unique(
        names in prop::collection::vec("[a-d]{1,2}", 0..12),
        user in prop::option::of("[a-z]{2,5}"),
    ) {
        let nodes = resolve_targets(Some("lan"), &names, &HashMap::new(), Some("pw"), user.as_deref());

        let identities: Vec<String> = nodes.iter().map(|n| n.login_identity()).collect();
        let unique: HashSet<&String> = identities.iter().collect();
        prop_assert_eq!(unique.len(), identities.len());

        let distinct_names: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(nodes.len(), distinct_names.len());
        for node in &nodes {
            prop_assert!(node.host.ends_with(".lan"));
            prop_assert_eq!(node.password.as_deref(), Some("pw"));
        }
    }
}
