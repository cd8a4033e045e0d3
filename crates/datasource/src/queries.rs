//! GraphQL queries against the Vulcanize endpoint.

/// Urn pages are fetched with this fixed size; the page loop stops at the
/// first empty page.
pub const URNS_PAGE_SIZE: u64 = 5000;

pub const URNS_QUERY: &str = "query ($offset: Int) {
      allUrns(first: 5000, offset: $offset) {
        nodes {
          urnIdentifier
          ilkIdentifier
          ink
          art
        }
      }
    }";

pub const ILKS_QUERY: &str = "query {
      allIlks(first: 100) {
        nodes {
          id
          spot
          rate
          mat
          chop
        }
      }
    }";
