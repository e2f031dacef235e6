//! The facade trait shared by every bound object type.

use os_core::{Handle, ObjectId};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// Typed, copyable view of one workspace object.
///
/// Facades hold only the object's id; every accessor takes the model.
pub trait ModelObject: Copy + Eq + core::fmt::Debug {
    const IDD_TYPE: &'static str;

    fn id(self) -> ObjectId;

    #[doc(hidden)]
    fn from_id_unchecked(id: ObjectId) -> Self;

    fn from_id(model: &Model, id: ObjectId) -> Option<Self> {
        model
            .workspace()
            .is_type(id, Self::IDD_TYPE)
            .then(|| Self::from_id_unchecked(id))
    }

    fn try_from_id(model: &Model, id: ObjectId) -> ModelResult<Self> {
        Self::from_id(model, id).ok_or(ModelError::WrongType {
            id,
            expected: Self::IDD_TYPE,
        })
    }

    fn handle(self, model: &Model) -> Option<Handle> {
        model.workspace().handle(self.id())
    }

    fn name(self, model: &Model) -> Option<String> {
        model.workspace().name(self.id()).map(str::to_string)
    }

    /// Sets the name, made unique among objects sharing a reference list.
    fn set_name(self, model: &mut Model, name: &str) -> ModelResult<String> {
        Ok(model.workspace_mut().set_unique_name(self.id(), name)?)
    }

    fn exists(self, model: &Model) -> bool {
        Self::from_id(model, self.id()).is_some()
    }

    /// Remove the object along with the objects it owns.
    fn remove(self, model: &mut Model) -> ModelResult<()> {
        model.remove_object(self.id())
    }
}

macro_rules! model_object {
    ($(#[$meta:meta])* $name:ident => $idd:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(os_core::ObjectId);

        impl $crate::object::ModelObject for $name {
            const IDD_TYPE: &'static str = $idd;

            fn id(self) -> os_core::ObjectId {
                self.0
            }

            fn from_id_unchecked(id: os_core::ObjectId) -> Self {
                Self(id)
            }
        }
    };
}

pub(crate) use model_object;
