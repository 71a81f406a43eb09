//! Mutual TLS for the daemon socket.
//!
//! Node services present certificates signed by the node's private CA and
//! require the caller to present one as well. The server certificate is not
//! checked against any root store; the handshake signature still is.

use crate::DaemonError;
use rustls::{
    ClientConfig, DigitallySignedStruct, SignatureScheme,
    client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    crypto::{CryptoProvider, ring, verify_tls12_signature, verify_tls13_signature},
    pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime},
};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Debug)]
struct PrivateCaVerifier {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for PrivateCaVerifier {
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
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

fn open(path: &Path) -> Result<BufReader<File>, DaemonError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| certificate_error(path, source))
}

fn certificate_error(path: &Path, source: std::io::Error) -> DaemonError {
    DaemonError::Certificate {
        path: path.to_path_buf(),
        source,
    }
}

fn missing(path: &Path, kind: &'static str) -> DaemonError {
    DaemonError::MissingPem {
        path: PathBuf::from(path),
        kind,
    }
}

/// Read a PEM certificate chain.
pub(crate) fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, DaemonError> {
    let certs = rustls_pemfile::certs(&mut open(path)?)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| certificate_error(path, source))?;
    if certs.is_empty() {
        return Err(missing(path, "certificate"));
    }
    Ok(certs)
}

/// Read the first PEM private key.
pub(crate) fn load_key(path: &Path) -> Result<PrivateKeyDer<'static>, DaemonError> {
    rustls_pemfile::private_key(&mut open(path)?)
        .map_err(|source| certificate_error(path, source))?
        .ok_or_else(|| missing(path, "private key"))
}

/// Client config presenting `cert`/`key` and accepting the node's private CA.
pub(crate) fn client_config(cert: &Path, key: &Path) -> Result<ClientConfig, DaemonError> {
    let certs = load_certs(cert)?;
    let key = load_key(key)?;

    let provider = Arc::new(ring::default_provider());
    let verifier = Arc::new(PrivateCaVerifier {
        provider: provider.clone(),
    });

    Ok(ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_client_auth_cert(certs, key)?)
}
