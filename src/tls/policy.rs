use crate::tls::error::TlsResult;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;

/// Which server certificates a run's client accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    /// Chain and hostname verification against the bundled web PKI roots
    #[default]
    Verified,
    /// Any certificate for any hostname (INSECURE - self-signed test targets only)
    AcceptAnyCertificate,
}

impl TlsPolicy {
    pub fn from_allow_self_signed(allow: bool) -> Self {
        if allow {
            TlsPolicy::AcceptAnyCertificate
        } else {
            TlsPolicy::Verified
        }
    }

    pub fn is_insecure(&self) -> bool {
        matches!(self, TlsPolicy::AcceptAnyCertificate)
    }
}

/// Build a rustls client config for `policy`.
///
/// Returns `None` for [`TlsPolicy::Verified`]; the HTTP client's own
/// verified defaults apply then.
pub fn client_config(policy: TlsPolicy) -> TlsResult<Option<ClientConfig>> {
    match policy {
        TlsPolicy::Verified => Ok(None),
        TlsPolicy::AcceptAnyCertificate => {
            // Explicit provider: never rely on (or install) a process default
            let provider = Arc::new(rustls::crypto::ring::default_provider());
            let mut config = ClientConfig::builder_with_provider(provider.clone())
                .with_safe_default_protocol_versions()?
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
                .with_no_client_auth();
            config.alpn_protocols = vec![b"http/1.1".to_vec()];
            Ok(Some(config))
        }
    }
}

// Certificate verifier that accepts any certificate (INSECURE - for testing only)
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
