//! Static catalog table.
//!
//! Rows are (slug, title, difficulty). Topics are inferred from slugs at
//! load time, so this file stays a pure data asset. Bump the version when
//! rows change: selection seeds are stable, but the ranked pool is not.

use super::Difficulty;

pub(super) const CATALOG_VERSION: &str = "2025.07";

pub(super) const PROBLEM_ROWS: &[(&str, &str, Difficulty)] = &[
    // Easy
    ("two-sum", "Two Sum", Difficulty::Easy),
    ("valid-parentheses", "Valid Parentheses", Difficulty::Easy),
    ("merge-two-sorted-lists", "Merge Two Sorted Lists", Difficulty::Easy),
    ("best-time-to-buy-and-sell-stock", "Best Time to Buy and Sell Stock", Difficulty::Easy),
    ("valid-anagram", "Valid Anagram", Difficulty::Easy),
    ("valid-palindrome", "Valid Palindrome", Difficulty::Easy),
    ("binary-search", "Binary Search", Difficulty::Easy),
    ("flood-fill", "Flood Fill", Difficulty::Easy),
    ("maximum-subarray", "Maximum Subarray", Difficulty::Easy),
    ("climbing-stairs", "Climbing Stairs", Difficulty::Easy),
    ("reverse-linked-list", "Reverse Linked List", Difficulty::Easy),
    ("linked-list-cycle", "Linked List Cycle", Difficulty::Easy),
    ("contains-duplicate", "Contains Duplicate", Difficulty::Easy),
    ("missing-number", "Missing Number", Difficulty::Easy),
    ("single-number", "Single Number", Difficulty::Easy),
    ("squares-of-a-sorted-array", "Squares of a Sorted Array", Difficulty::Easy),
    ("balanced-binary-tree", "Balanced Binary Tree", Difficulty::Easy),
    ("invert-binary-tree", "Invert Binary Tree", Difficulty::Easy),
    ("min-stack", "Min Stack", Difficulty::Easy),
    ("implement-queue-using-stacks", "Implement Queue using Stacks", Difficulty::Easy),
    ("palindrome-number", "Palindrome Number", Difficulty::Easy),
    ("moving-average-from-data-stream", "Moving Average from Data Stream", Difficulty::Easy),
    // Medium
    ("add-two-numbers", "Add Two Numbers", Difficulty::Medium),
    ("longest-substring-without-repeating-characters", "Longest Substring Without Repeating Characters", Difficulty::Medium),
    ("3sum", "3Sum", Difficulty::Medium),
    ("container-with-most-water", "Container With Most Water", Difficulty::Medium),
    ("group-anagrams", "Group Anagrams", Difficulty::Medium),
    ("longest-palindromic-substring", "Longest Palindromic Substring", Difficulty::Medium),
    ("product-of-array-except-self", "Product of Array Except Self", Difficulty::Medium),
    ("merge-intervals", "Merge Intervals", Difficulty::Medium),
    ("insert-interval", "Insert Interval", Difficulty::Medium),
    ("meeting-rooms-ii", "Meeting Rooms II", Difficulty::Medium),
    ("course-schedule", "Course Schedule", Difficulty::Medium),
    ("number-of-islands", "Number of Islands", Difficulty::Medium),
    ("clone-graph", "Clone Graph", Difficulty::Medium),
    ("rotting-oranges", "Rotting Oranges", Difficulty::Medium),
    ("coin-change", "Coin Change", Difficulty::Medium),
    ("house-robber", "House Robber", Difficulty::Medium),
    ("longest-increasing-subsequence", "Longest Increasing Subsequence", Difficulty::Medium),
    ("word-break", "Word Break", Difficulty::Medium),
    ("combination-sum", "Combination Sum", Difficulty::Medium),
    ("permutations", "Permutations", Difficulty::Medium),
    ("subsets", "Subsets", Difficulty::Medium),
    ("letter-combinations-of-a-phone-number", "Letter Combinations of a Phone Number", Difficulty::Medium),
    ("top-k-frequent-elements", "Top K Frequent Elements", Difficulty::Medium),
    ("kth-largest-element-in-an-array", "Kth Largest Element in an Array", Difficulty::Medium),
    ("k-closest-points-to-origin", "K Closest Points to Origin", Difficulty::Medium),
    ("lru-cache", "LRU Cache", Difficulty::Medium),
    ("design-hit-counter", "Design Hit Counter", Difficulty::Medium),
    ("design-twitter", "Design Twitter", Difficulty::Medium),
    ("time-based-key-value-store", "Time Based Key-Value Store", Difficulty::Medium),
    ("snapshot-array", "Snapshot Array", Difficulty::Medium),
    ("search-in-rotated-sorted-array", "Search in Rotated Sorted Array", Difficulty::Medium),
    ("find-first-and-last-position-of-element-in-sorted-array", "Find First and Last Position of Element in Sorted Array", Difficulty::Medium),
    ("binary-tree-level-order-traversal", "Binary Tree Level Order Traversal", Difficulty::Medium),
    ("validate-binary-search-tree", "Validate Binary Search Tree", Difficulty::Medium),
    ("lowest-common-ancestor-of-a-binary-search-tree", "Lowest Common Ancestor of a Binary Search Tree", Difficulty::Medium),
    ("implement-trie-prefix-tree", "Implement Trie (Prefix Tree)", Difficulty::Medium),
    ("daily-temperatures", "Daily Temperatures", Difficulty::Medium),
    ("evaluate-reverse-polish-notation", "Evaluate Reverse Polish Notation", Difficulty::Medium),
    ("gas-station", "Gas Station", Difficulty::Medium),
    ("jump-game", "Jump Game", Difficulty::Medium),
    ("sort-colors", "Sort Colors", Difficulty::Medium),
    ("partition-labels", "Partition Labels", Difficulty::Medium),
    ("accounts-merge", "Accounts Merge", Difficulty::Medium),
    ("longest-consecutive-sequence", "Longest Consecutive Sequence", Difficulty::Medium),
    // Hard
    ("merge-k-sorted-lists", "Merge k Sorted Lists", Difficulty::Hard),
    ("trapping-rain-water", "Trapping Rain Water", Difficulty::Hard),
    ("median-of-two-sorted-arrays", "Median of Two Sorted Arrays", Difficulty::Hard),
    ("sliding-window-maximum", "Sliding Window Maximum", Difficulty::Hard),
    ("minimum-window-substring", "Minimum Window Substring", Difficulty::Hard),
    ("word-ladder", "Word Ladder", Difficulty::Hard),
    ("serialize-and-deserialize-binary-tree", "Serialize and Deserialize Binary Tree", Difficulty::Hard),
    ("lfu-cache", "LFU Cache", Difficulty::Hard),
    ("design-search-autocomplete-system", "Design Search Autocomplete System", Difficulty::Hard),
    ("alien-dictionary", "Alien Dictionary", Difficulty::Hard),
    ("regular-expression-matching", "Regular Expression Matching", Difficulty::Hard),
    ("edit-distance", "Edit Distance", Difficulty::Hard),
    ("n-queens", "N-Queens", Difficulty::Hard),
    ("largest-rectangle-in-histogram", "Largest Rectangle in Histogram", Difficulty::Hard),
    ("binary-tree-maximum-path-sum", "Binary Tree Maximum Path Sum", Difficulty::Hard),
    ("find-median-from-data-stream", "Find Median from Data Stream", Difficulty::Hard),
];
