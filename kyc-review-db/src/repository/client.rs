use crate::models::client::ClientModel;
use crate::repository::{CreateBatch, FindByAgencyId, Load};

pub trait ClientRepository: CreateBatch<ClientModel> + Load<ClientModel> + FindByAgencyId<ClientModel> {}

impl<R> ClientRepository for R where R: CreateBatch<ClientModel> + Load<ClientModel> + FindByAgencyId<ClientModel> {}
