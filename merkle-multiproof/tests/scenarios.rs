use merkle_multiproof::prelude::*;

fn keccak_leaves(preimages: &[&str]) -> Vec<Digest> {
    preimages
        .iter()
        .map(|preimage| Keccak256::hash_leaf(preimage.as_bytes()))
        .collect()
}

#[test]
fn subset_of_six_sorted_leaves_verifies() {
    let leaves = keccak_leaves(&["a", "b", "c", "d", "e", "f"]);
    let tree = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap();
    let subset = keccak_leaves(&["b", "d", "f"]);

    let multiproof = tree.multiproof(&subset).unwrap();
    assert_eq!(3, multiproof.leaves.len());
    assert_eq!(
        multiproof.proof.len() + multiproof.leaves.len() - 1,
        multiproof.flags.len()
    );
    assert_eq!(Ok(true), multiproof.verify::<Keccak256>(tree.root()));
    assert_eq!(
        Ok(()),
        ensure_multiproof::<Keccak256>(
            tree.root(),
            &multiproof.leaves,
            &multiproof.proof,
            &multiproof.flags,
        )
    );

    let mut tampered_flags = multiproof.flags.clone();
    let last_flag = tampered_flags.last_mut().unwrap();
    *last_flag = !*last_flag;
    let verdict = verify_multiproof::<Keccak256>(
        tree.root(),
        &multiproof.leaves,
        &multiproof.proof,
        &tampered_flags,
    );
    assert!(verdict.is_err(), "tampered flags must be rejected: {verdict:?}");
}

#[test]
fn root_of_six_sorted_leaves_pairs_like_a_balanced_tree() {
    let mut leaves = keccak_leaves(&["a", "b", "c", "d", "e", "f"]);
    leaves.sort();
    let tree = MerkleTree::<Keccak256>::new(&leaves).unwrap();

    let h01 = Keccak256::combine(leaves[0], leaves[1]);
    let h23 = Keccak256::combine(leaves[2], leaves[3]);
    let h45 = Keccak256::combine(leaves[4], leaves[5]);
    let expected_root = Keccak256::combine(Keccak256::combine(h01, h23), h45);
    assert_eq!(expected_root, tree.root());
}

#[test]
fn single_leaf_tree_is_proven_by_empty_proof() {
    let leaf = Keccak256::hash_leaf(b"x");
    let tree = MerkleTree::<Keccak256>::new(&[leaf]).unwrap();
    assert_eq!(leaf, tree.root());

    let multiproof = tree.multiproof(&[leaf]).unwrap();
    assert_eq!(vec![leaf], multiproof.leaves);
    assert!(multiproof.proof.is_empty());
    assert!(multiproof.flags.is_empty());
    assert_eq!(Ok(leaf), multiproof.derive_root::<Keccak256>());
    assert_eq!(Ok(true), verify_multiproof::<Keccak256>(leaf, &[leaf], &[], &[]));
}

#[test]
fn absent_leaf_cannot_be_proven() {
    let leaves = keccak_leaves(&["a", "b", "c", "d", "e", "f"]);
    let tree = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap();
    let absent = Keccak256::hash_leaf(b"z");

    let err = tree.multiproof(&[leaves[0], absent]).unwrap_err();
    assert_eq!(MerkleTreeError::LeafNotFound(absent), err);
}

#[test]
fn root_of_five_leaves_is_independent_of_insertion_order() {
    let leaves = keccak_leaves(&["a", "b", "c", "d", "e"]);
    let mut sorted_leaves = leaves.clone();
    sorted_leaves.sort();
    let largest_leaf = sorted_leaves[4];

    let mut largest_leaf_first = vec![largest_leaf];
    largest_leaf_first.extend(sorted_leaves.iter().take(4));
    let mut largest_leaf_last = sorted_leaves.clone();
    largest_leaf_last.reverse();
    largest_leaf_last.rotate_left(1);
    assert_eq!(Some(&largest_leaf), largest_leaf_last.last());

    let root = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap().root();
    for permutation in [largest_leaf_first, largest_leaf_last] {
        let tree = MerkleTree::<Keccak256>::new_sorted(&permutation).unwrap();
        assert_eq!(root, tree.root());
    }

    let [s0, s1, s2, s3, s4]: [Digest; 5] = sorted_leaves.try_into().unwrap();
    let h01 = Keccak256::combine(s0, s1);
    let h23 = Keccak256::combine(s2, s3);
    let expected_root = Keccak256::combine(h23, Keccak256::combine(s4, h01));
    assert_eq!(expected_root, root);
}

#[test]
fn every_subset_of_five_sorted_leaves_verifies() {
    let leaves = keccak_leaves(&["a", "b", "c", "d", "e"]);
    let tree = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap();

    for subset_mask in 1_u32..(1 << leaves.len()) {
        let subset = leaves
            .iter()
            .enumerate()
            .filter(|(i, _)| subset_mask & (1 << i) != 0)
            .map(|(_, &leaf)| leaf)
            .collect::<Vec<_>>();
        let multiproof = tree.multiproof(&subset).unwrap();
        assert_eq!(Ok(true), multiproof.verify::<Keccak256>(tree.root()));
    }
}

#[test]
fn authentication_paths_agree_with_single_leaf_multiproofs() {
    let leaves = keccak_leaves(&["a", "b", "c", "d", "e", "f", "g"]);
    let tree = MerkleTree::<Keccak256>::new_sorted(&leaves).unwrap();

    for (index, &leaf) in tree.leaves().iter().enumerate() {
        let path = tree.authentication_path(index).unwrap();
        assert!(MerkleTree::<Keccak256>::verify_authentication_path(
            tree.root(),
            leaf,
            &path
        ));

        let multiproof = tree.multiproof(&[leaf]).unwrap();
        assert_eq!(path, multiproof.proof);
        assert!(multiproof.flags.iter().all(|&flag| !flag));
    }
}
