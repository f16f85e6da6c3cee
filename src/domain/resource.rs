//! Structure resource types served under `/service/{resource}/{agency}/{id}`.

use crate::xml::ElementSelector;

/// A structural metadata resource the client can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureResource {
    DataStructure,
    Codelist,
    AgencyScheme,
    Categorisation,
    CategoryScheme,
    ConceptScheme,
    ContentConstraint,
    Dataflow,
    HierarchicalCodelist,
    OrganisationScheme,
    StructureSet,
}

impl StructureResource {
    pub const ALL: [StructureResource; 11] = [
        StructureResource::DataStructure,
        StructureResource::Codelist,
        StructureResource::AgencyScheme,
        StructureResource::Categorisation,
        StructureResource::CategoryScheme,
        StructureResource::ConceptScheme,
        StructureResource::ContentConstraint,
        StructureResource::Dataflow,
        StructureResource::HierarchicalCodelist,
        StructureResource::OrganisationScheme,
        StructureResource::StructureSet,
    ];

    /// First segment of the REST resource path.
    pub fn path_segment(self) -> &'static str {
        match self {
            StructureResource::DataStructure => "datastructure",
            StructureResource::Codelist => "codelist",
            StructureResource::AgencyScheme => "agencyscheme",
            StructureResource::Categorisation => "categorisation",
            StructureResource::CategoryScheme => "categoryscheme",
            StructureResource::ConceptScheme => "conceptscheme",
            StructureResource::ContentConstraint => "contentconstraint",
            StructureResource::Dataflow => "dataflow",
            StructureResource::HierarchicalCodelist => "hierarchicalcodelist",
            StructureResource::OrganisationScheme => "organisationscheme",
            StructureResource::StructureSet => "structureset",
        }
    }

    /// Which elements of the structure message carry the artefacts.
    ///
    /// Organisation schemes come back as one of four concrete scheme types,
    /// so that selector matches all of them.
    pub fn selector(self) -> ElementSelector {
        match self {
            StructureResource::DataStructure => ElementSelector::any_of(&["DataStructure"]),
            StructureResource::Codelist => ElementSelector::any_of(&["Codelist"]),
            StructureResource::AgencyScheme => ElementSelector::any_of(&["AgencyScheme"]),
            StructureResource::Categorisation => ElementSelector::any_of(&["Categorisation"]),
            StructureResource::CategoryScheme => ElementSelector::any_of(&["CategoryScheme"]),
            StructureResource::ConceptScheme => ElementSelector::any_of(&["ConceptScheme"]),
            StructureResource::ContentConstraint => {
                ElementSelector::any_of(&["ContentConstraint"])
            }
            StructureResource::Dataflow => ElementSelector::any_of(&["Dataflow"]),
            StructureResource::HierarchicalCodelist => {
                ElementSelector::any_of(&["HierarchicalCodelist"])
            }
            StructureResource::OrganisationScheme => ElementSelector::any_of(&[
                "AgencyScheme",
                "DataProviderScheme",
                "DataConsumerScheme",
                "OrganisationUnitScheme",
            ]),
            StructureResource::StructureSet => ElementSelector::any_of(&["StructureSet"]),
        }
    }
}
