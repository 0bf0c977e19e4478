pub mod extract;
pub mod generic;
pub mod mixins;
pub mod resource;
pub mod viewset;

pub use extract::{ApiPayload, ObjectId};
pub use generic::{ListApiView, ListCreateApiView, Permission, RetrieveUpdateDestroyApiView};
pub use mixins::{
    CreateModelMixin, DestroyModelMixin, GenericApiView, ListModelMixin, RetrieveModelMixin,
    UpdateModelMixin,
};
pub use resource::{ModelResource, TodoResource, UserResource, WritableResource};
pub use viewset::{Action, ModelViewSet};
